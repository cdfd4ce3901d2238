use crate::error::MediaError;
use base64::Engine;
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::QrCode;
use std::io::Cursor;

/// Render a pairing code as a `data:image/png;base64,...` URL for browsers.
pub fn qr_data_url(code: &str) -> Result<String, MediaError> {
    let qr = QrCode::new(code.as_bytes())?;
    let img = qr.render::<Luma<u8>>().min_dimensions(256, 256).build();
    let mut png = Vec::new();
    DynamicImage::ImageLuma8(img).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png)
    ))
}
