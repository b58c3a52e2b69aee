//! Caption font with graceful fallback
//!
//! Placeholder captions are drawn with the first scalable font found in
//! an ordered candidate list of system paths. When none is available the
//! embedded 5×7 bitmap font below takes over, so rendering a placeholder
//! can never fail a request.

use ab_glyph::{Font as _, FontVec, PxScale, ScaleFont as _};
use image::{Rgb, RgbImage};
use std::sync::OnceLock;

/// Scalable font candidates, tried in order
const CANDIDATAS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Caption font: a scalable TTF when one is available, otherwise the
/// embedded bitmap font.
pub enum Fonte {
    Escalavel(FontVec),
    Bitmap,
}

static FONTE: OnceLock<Fonte> = OnceLock::new();

/// Process-wide caption font, loaded on first use.
pub fn fonte() -> &'static Fonte {
    FONTE.get_or_init(Fonte::carregar)
}

impl Fonte {
    fn carregar() -> Self {
        for caminho in CANDIDATAS {
            if let Ok(dados) = std::fs::read(caminho)
                && let Ok(f) = FontVec::try_from_vec(dados)
            {
                tracing::debug!(caminho = %caminho, "Scalable caption font loaded");
                return Fonte::Escalavel(f);
            }
        }
        tracing::debug!("No scalable font available, using embedded bitmap font");
        Fonte::Bitmap
    }

    /// Bounding box (width, height) of `texto` at `px` pixels.
    pub fn medir(&self, texto: &str, px: f32) -> (u32, u32) {
        match self {
            Fonte::Escalavel(f) => {
                let escalada = f.as_scaled(PxScale::from(px));
                let mut largura = 0.0f32;
                let mut anterior: Option<ab_glyph::GlyphId> = None;
                for c in texto.chars() {
                    let glifo = f.glyph_id(c);
                    if let Some(ant) = anterior {
                        largura += escalada.kern(ant, glifo);
                    }
                    largura += escalada.h_advance(glifo);
                    anterior = Some(glifo);
                }
                let altura = escalada.ascent() - escalada.descent();
                (largura.ceil() as u32, altura.ceil() as u32)
            }
            Fonte::Bitmap => {
                let escala = escala_bitmap(px);
                let n = texto.chars().count() as u32;
                if n == 0 {
                    return (0, GLYPH_H * escala);
                }
                // 5 columns per glyph plus 1 of spacing, minus the
                // trailing space
                (n * (GLYPH_W + 1) * escala - escala, GLYPH_H * escala)
            }
        }
    }

    /// Draw `texto` with its top-left corner at (x, y).
    pub fn desenhar(
        &self,
        canvas: &mut RgbImage,
        x: i32,
        y: i32,
        px: f32,
        cor: Rgb<u8>,
        texto: &str,
    ) {
        match self {
            Fonte::Escalavel(f) => {
                imageproc::drawing::draw_text_mut(canvas, cor, x, y, PxScale::from(px), f, texto);
            }
            Fonte::Bitmap => desenhar_bitmap(canvas, x, y, px, cor, texto),
        }
    }
}

// ───────────────────────── embedded bitmap font ─────────────────────────

const GLYPH_W: u32 = 5;
const GLYPH_H: u32 = 7;

/// Pixel block size for the bitmap font at a requested px height
fn escala_bitmap(px: f32) -> u32 {
    ((px / 8.0).round() as u32).max(1)
}

fn desenhar_bitmap(canvas: &mut RgbImage, x: i32, y: i32, px: f32, cor: Rgb<u8>, texto: &str) {
    let escala = escala_bitmap(px) as i32;
    let mut cx = x;
    for c in texto.chars() {
        if let Some(linhas) = glifo(c) {
            for (row, bits) in linhas.iter().enumerate() {
                for col in 0..GLYPH_W {
                    if bits & (0b10000 >> col) != 0 {
                        preencher_bloco(
                            canvas,
                            cx + col as i32 * escala,
                            y + row as i32 * escala,
                            escala,
                            cor,
                        );
                    }
                }
            }
        }
        cx += (GLYPH_W + 1) as i32 * escala;
    }
}

fn preencher_bloco(canvas: &mut RgbImage, x: i32, y: i32, lado: i32, cor: Rgb<u8>) {
    for dy in 0..lado {
        for dx in 0..lado {
            let (px, py) = (x + dx, y + dy);
            if px >= 0 && py >= 0 && (px as u32) < canvas.width() && (py as u32) < canvas.height() {
                canvas.put_pixel(px as u32, py as u32, cor);
            }
        }
    }
}

/// 5×7 glyph rows, one bit per column (MSB = leftmost of 5).
///
/// Covers A-Z and 0-9; lowercase folds to uppercase, space advances,
/// anything else is skipped.
fn glifo(c: char) -> Option<[u8; GLYPH_H as usize]> {
    let rows = match c.to_ascii_uppercase() {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        _ => return None,
    };
    Some(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn medir_bitmap_cresce_com_o_texto() {
        let fonte = Fonte::Bitmap;
        let (w1, h1) = fonte.medir("AB", 16.0);
        let (w2, h2) = fonte.medir("ABCD", 16.0);
        assert!(w2 > w1);
        assert_eq!(h1, h2);
    }

    #[test]
    fn escala_bitmap_tem_piso() {
        assert_eq!(escala_bitmap(1.0), 1);
        assert_eq!(escala_bitmap(10.0), 1);
        assert_eq!(escala_bitmap(16.0), 2);
        assert_eq!(escala_bitmap(32.0), 4);
    }

    #[test]
    fn desenhar_bitmap_pinta_dentro_do_canvas() {
        let mut canvas = RgbImage::from_pixel(64, 64, Rgb([0, 0, 0]));
        let fonte = Fonte::Bitmap;
        fonte.desenhar(&mut canvas, 2, 2, 16.0, Rgb([255, 255, 255]), "AI 7");
        let pintados = canvas
            .pixels()
            .filter(|p| p.0 == [255, 255, 255])
            .count();
        assert!(pintados > 0);
    }

    #[test]
    fn desenhar_fora_do_canvas_nao_entra_em_panico() {
        let mut canvas = RgbImage::from_pixel(8, 8, Rgb([0, 0, 0]));
        let fonte = Fonte::Bitmap;
        fonte.desenhar(&mut canvas, -20, -20, 32.0, Rgb([255, 255, 255]), "GRANDE");
        fonte.desenhar(&mut canvas, 100, 100, 32.0, Rgb([255, 255, 255]), "FORA");
    }
}
