//! Placeholder image synthesis
//!
//! A product without a photo gets a neutral-gray square with a white
//! caption centered from the measured text box. One parameterized
//! generator serves both the full-image path (480, single line) and the
//! thumbnail path (arbitrary size, two lines).

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

use super::font;
use shared::{AppError, AppResult};

const CINZA: Rgb<u8> = Rgb([128, 128, 128]);
const BRANCO: Rgb<u8> = Rgb([255, 255, 255]);

/// Fraction of the font size left between caption lines
const ESPACO_ENTRE_LINHAS: f32 = 0.25;

/// Render a `tamanho`×`tamanho` placeholder with the caption lines
/// centered, encoded as PNG.
pub fn render(tamanho: u32, linhas: &[&str], px: f32) -> AppResult<Vec<u8>> {
    let mut canvas = RgbImage::from_pixel(tamanho, tamanho, CINZA);

    let fonte = font::fonte();
    let medidas: Vec<(u32, u32)> = linhas.iter().map(|l| fonte.medir(l, px)).collect();

    let espaco = (px * ESPACO_ENTRE_LINHAS).round() as u32;
    let altura_total: u32 = medidas.iter().map(|(_, h)| *h).sum::<u32>()
        + espaco * linhas.len().saturating_sub(1) as u32;

    let mut y = (tamanho as i32 - altura_total as i32) / 2;
    for (linha, (largura, altura)) in linhas.iter().zip(&medidas) {
        let x = (tamanho as i32 - *largura as i32) / 2;
        fonte.desenhar(&mut canvas, x, y, px, BRANCO, linha);
        y += (*altura + espaco) as i32;
    }

    codificar_png(canvas)
}

fn codificar_png(canvas: RgbImage) -> AppResult<Vec<u8>> {
    let mut saida = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(canvas)
        .write_to(&mut saida, ImageFormat::Png)
        .map_err(|e| AppError::internal(format!("Failed to encode placeholder: {e}")))?;
    Ok(saida.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_tem_exatamente_o_tamanho_pedido() {
        for tamanho in [16u32, 128, 480] {
            let png = render(tamanho, &["Produto", "sem foto"], 16.0).unwrap();
            let img = image::load_from_memory(&png).unwrap();
            assert_eq!(img.width(), tamanho);
            assert_eq!(img.height(), tamanho);
        }
    }

    #[test]
    fn placeholder_e_png() {
        let png = render(64, &["Produto sem foto"], 10.0).unwrap();
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
        assert_eq!(image::guess_format(&png).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn placeholder_tem_fundo_cinza_e_legenda() {
        let png = render(128, &["Produto", "sem foto"], 16.0).unwrap();
        let img = image::load_from_memory(&png).unwrap().to_rgb8();
        let cinzas = img.pixels().filter(|p| p.0 == [128, 128, 128]).count();
        // Background dominates; the caption leaves non-gray pixels behind
        assert!(cinzas > (128 * 128) / 2);
        assert!(img.pixels().any(|p| p.0 != [128, 128, 128]));
    }

    #[test]
    fn legenda_maior_que_o_canvas_nao_falha() {
        // A 16px canvas with a 32px caption draws partially off-canvas
        let png = render(16, &["Produto sem foto"], 32.0).unwrap();
        let img = image::load_from_memory(&png).unwrap();
        assert_eq!((img.width(), img.height()), (16, 16));
    }
}
