use log::debug;
use qrcode::QrCode;
use qrcode::render::unicode;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("cannot read image: {0}")]
    Image(#[from] image::ImageError),
    #[error("no QR code found in the image")]
    NoCode,
    #[error("cannot decode QR code: {0}")]
    Decode(#[from] rqrr::DeQRError),
    #[error("cannot render QR code: {0}")]
    Render(#[from] qrcode::types::QrError),
}

/// Прочитать QR-код из файла картинки и вернуть вшитый текст.
pub fn read_qr(path: &Path) -> Result<String, ArtifactError> {
    let img = image::open(path)?.to_luma8();
    let (width, height) = img.dimensions();

    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
        width as usize,
        height as usize,
        |x, y| img.get_pixel(x as u32, y as u32).0[0],
    );

    let grids = prepared.detect_grids();
    let grid = grids.first().ok_or(ArtifactError::NoCode)?;
    let (_, content) = grid.decode()?;

    debug!("decoded {} bytes from {}", content.len(), path.display());
    Ok(content)
}

/// Нарисовать QR-код для строки как unicode-блоки для терминала.
pub fn render_qr(text: &str) -> Result<String, ArtifactError> {
    let code = QrCode::new(text.as_bytes())?;
    // Инвертируем цвета: на тёмном фоне терминала код иначе не читается.
    Ok(code
        .render::<unicode::Dense1x2>()
        .dark_color(unicode::Dense1x2::Light)
        .light_color(unicode::Dense1x2::Dark)
        .build())
}
