//! Media derivation
//!
//! Produces the bytes served by `/produto/imagem/{id}` and
//! `/produto/thumbnail/{id}`: either the stored photo (verbatim or
//! downscaled) or a synthesized placeholder when the product has no
//! photo.
//!
//! A corrupted stored payload (bad base64, undecodable image) is a
//! server fault and fails the request; the placeholder path never fails.

pub mod font;
pub mod placeholder;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use std::io::Cursor;

use shared::models::Produto;
use shared::{AppError, AppResult, ErrorCode};

/// Canvas side of the full-image placeholder
pub const TAMANHO_IMAGEM: u32 = 480;
/// Default thumbnail bound
pub const TAMANHO_THUMBNAIL: u32 = 128;

/// Caption size on the full-image placeholder
const PX_IMAGEM: f32 = 32.0;
/// Readability floor for the thumbnail caption
const PX_MINIMO: f32 = 10.0;

const MIME_PNG: &str = "image/png";

/// Full image: the stored photo verbatim, or a 480×480 placeholder.
pub fn imagem(produto: &Produto) -> AppResult<(Vec<u8>, String)> {
    if !produto.possui_foto {
        let png = placeholder::render(TAMANHO_IMAGEM, &["Produto sem foto"], PX_IMAGEM)?;
        return Ok((png, MIME_PNG.to_string()));
    }

    let bytes = decodificar_foto(produto)?;
    Ok((bytes, mime_armazenado(produto)?))
}

/// Thumbnail bounded by `tamanho`×`tamanho`: the stored photo downscaled
/// preserving aspect ratio and re-encoded in its original format, or a
/// placeholder of exactly the requested size.
///
/// Photos already within bounds are kept at their original dimensions
/// (no upscaling).
pub fn thumbnail(produto: &Produto, tamanho: u32) -> AppResult<(Vec<u8>, String)> {
    if !produto.possui_foto {
        let px = (tamanho as f32 / 8.0).max(PX_MINIMO);
        let png = placeholder::render(tamanho, &["Produto", "sem foto"], px)?;
        return Ok((png, MIME_PNG.to_string()));
    }

    let bytes = decodificar_foto(produto)?;
    let formato = image::guess_format(&bytes)
        .map_err(|e| foto_corrompida(produto.id, format!("unknown format: {e}")))?;
    let img = image::load_from_memory(&bytes)
        .map_err(|e| foto_corrompida(produto.id, format!("decode failed: {e}")))?;

    let reduzida = if img.width() <= tamanho && img.height() <= tamanho {
        img
    } else {
        // Uniform factor min(t/w, t/h), aspect ratio preserved
        img.thumbnail(tamanho, tamanho)
    };

    let mut saida = Cursor::new(Vec::new());
    reduzida
        .write_to(&mut saida, formato)
        .map_err(|e| AppError::internal(format!("Failed to encode thumbnail: {e}")))?;

    Ok((saida.into_inner(), mime_armazenado(produto)?))
}

fn decodificar_foto(produto: &Produto) -> AppResult<Vec<u8>> {
    let payload = produto
        .foto_base64
        .as_deref()
        .ok_or_else(|| foto_corrompida(produto.id, "possui_foto set but payload missing".into()))?;
    BASE64
        .decode(payload)
        .map_err(|e| foto_corrompida(produto.id, format!("invalid base64: {e}")))
}

fn mime_armazenado(produto: &Produto) -> AppResult<String> {
    produto
        .foto_mime
        .clone()
        .ok_or_else(|| foto_corrompida(produto.id, "possui_foto set but mime missing".into()))
}

fn foto_corrompida(id: i64, motivo: String) -> AppError {
    AppError::with_message(ErrorCode::FotoCorrompida, "Foto armazenada inválida")
        .with_detail("produto", id)
        .with_detail("motivo", motivo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};

    fn produto_sem_foto() -> Produto {
        Produto {
            id: 1,
            nome: "Arroz".into(),
            preco: rust_decimal::Decimal::new(1050, 2),
            estoque: 5,
            ativo: true,
            possui_foto: false,
            foto_base64: None,
            foto_mime: None,
            categorias: vec![],
            created_at: 0,
            updated_at: 0,
        }
    }

    fn produto_com_foto(largura: u32, altura: u32, formato: ImageFormat, mime: &str) -> Produto {
        let img = RgbImage::from_pixel(largura, altura, Rgb([10, 200, 30]));
        let mut bytes = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut bytes, formato)
            .unwrap();

        let mut p = produto_sem_foto();
        p.possui_foto = true;
        p.foto_base64 = Some(BASE64.encode(bytes.into_inner()));
        p.foto_mime = Some(mime.to_string());
        p
    }

    #[test]
    fn imagem_sem_foto_gera_placeholder_480() {
        let (bytes, mime) = imagem(&produto_sem_foto()).unwrap();
        assert_eq!(mime, "image/png");
        let img = image::load_from_memory(&bytes).unwrap();
        assert_eq!((img.width(), img.height()), (480, 480));
    }

    #[test]
    fn imagem_com_foto_devolve_payload_identico() {
        let p = produto_com_foto(32, 32, ImageFormat::Png, "image/png");
        let originais = BASE64.decode(p.foto_base64.as_deref().unwrap()).unwrap();
        let (bytes, mime) = imagem(&p).unwrap();
        assert_eq!(bytes, originais);
        assert_eq!(mime, "image/png");
    }

    #[test]
    fn thumbnail_preserva_proporcao_e_limite() {
        let p = produto_com_foto(200, 100, ImageFormat::Png, "image/png");
        let (bytes, mime) = thumbnail(&p, 64).unwrap();
        assert_eq!(mime, "image/png");

        let img = image::load_from_memory(&bytes).unwrap();
        assert!(img.width().max(img.height()) <= 64);
        // 200:100 = 2:1, within rounding
        let proporcao = img.width() as f64 / img.height() as f64;
        assert!((proporcao - 2.0).abs() < 0.1, "proporcao = {proporcao}");
    }

    #[test]
    fn thumbnail_mantem_o_formato_original() {
        let p = produto_com_foto(100, 100, ImageFormat::Jpeg, "image/jpeg");
        let (bytes, mime) = thumbnail(&p, 50).unwrap();
        assert_eq!(mime, "image/jpeg");
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn thumbnail_nao_amplia_foto_pequena() {
        let p = produto_com_foto(50, 40, ImageFormat::Png, "image/png");
        let (bytes, _) = thumbnail(&p, 128).unwrap();
        let img = image::load_from_memory(&bytes).unwrap();
        assert_eq!((img.width(), img.height()), (50, 40));
    }

    #[test]
    fn thumbnail_sem_foto_tem_o_tamanho_exato() {
        for tamanho in [16u32, 128, 300] {
            let (bytes, mime) = thumbnail(&produto_sem_foto(), tamanho).unwrap();
            assert_eq!(mime, "image/png");
            let img = image::load_from_memory(&bytes).unwrap();
            assert_eq!((img.width(), img.height()), (tamanho, tamanho));
        }
    }

    #[test]
    fn payload_corrompido_e_erro_de_servidor() {
        let mut p = produto_sem_foto();
        p.possui_foto = true;
        p.foto_mime = Some("image/png".into());

        p.foto_base64 = Some("###não é base64###".into());
        let err = thumbnail(&p, 64).unwrap_err();
        assert_eq!(err.code, ErrorCode::FotoCorrompida);

        // Valid base64 of bytes that are not an image
        p.foto_base64 = Some(BASE64.encode(b"definitivamente nao e uma imagem"));
        let err = imagem_depois_thumbnail(&p);
        assert_eq!(err.code, ErrorCode::FotoCorrompida);
    }

    fn imagem_depois_thumbnail(p: &Produto) -> AppError {
        // imagem() returns stored bytes verbatim, so only the thumbnail
        // path decodes and can detect this corruption
        thumbnail(p, 64).unwrap_err()
    }
}
