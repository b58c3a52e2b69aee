//! Produto form: multipart parsing and validation
//!
//! The add and edit flows submit the same multipart form (nome, preco,
//! estoque, ativo, foto, categorias multi-select, removerfoto). Parsing
//! collects the raw fields; validation turns them into the repository
//! payload or a list of field errors.

use axum::extract::Multipart;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use std::str::FromStr;

use super::ErroCampo;
use crate::utils::validation::MAX_NOME_PRODUTO;
use shared::models::{FotoPayload, ProdutoCreate, ProdutoUpdate};
use shared::util::parse_id;
use shared::{AppError, AppResult};

/// Extensions the photo upload accepts
const EXTENSOES_FOTO: &[&str] = &["jpg", "jpeg", "png"];

/// Uploaded photo file, as received
#[derive(Debug, Clone)]
pub struct ArquivoFoto {
    pub nome_arquivo: String,
    pub content_type: Option<String>,
    pub dados: Vec<u8>,
}

/// Raw produto form fields, straight from the multipart body
#[derive(Debug, Default)]
pub struct ProdutoForm {
    pub nome: Option<String>,
    pub preco: Option<String>,
    pub estoque: Option<String>,
    pub ativo: bool,
    pub foto: Option<ArquivoFoto>,
    pub categorias: Vec<String>,
    pub removerfoto: bool,
}

impl ProdutoForm {
    /// Collect the known fields from the multipart body; unknown fields
    /// are ignored.
    pub async fn from_multipart(multipart: &mut Multipart) -> AppResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::validation(format!("Invalid multipart request: {e}")))?
        {
            let campo = field.name().unwrap_or("").to_string();
            match campo.as_str() {
                "nome" => form.nome = Some(texto(field).await?),
                "preco" => form.preco = Some(texto(field).await?),
                "estoque" => form.estoque = Some(texto(field).await?),
                "ativo" => form.ativo = checkbox(&texto(field).await?),
                "removerfoto" => form.removerfoto = checkbox(&texto(field).await?),
                "categorias" => form.categorias.push(texto(field).await?),
                "foto" => {
                    let nome_arquivo = field.file_name().unwrap_or("").to_string();
                    let content_type = field.content_type().map(|s| s.to_string());
                    let dados = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
                        .to_vec();
                    // Browsers submit an empty file part when nothing is
                    // selected
                    if !dados.is_empty() {
                        form.foto = Some(ArquivoFoto {
                            nome_arquivo,
                            content_type,
                            dados,
                        });
                    }
                }
                _ => {}
            }
        }

        Ok(form)
    }

    /// Validate into a create payload.
    pub fn validar_create(self) -> Result<ProdutoCreate, Vec<ErroCampo>> {
        let campos = self.validar_campos()?;
        Ok(ProdutoCreate {
            nome: campos.nome,
            preco: campos.preco,
            estoque: campos.estoque,
            ativo: campos.ativo,
            foto: campos.foto,
            categorias: campos.categorias,
        })
    }

    /// Validate into an update payload.
    pub fn validar_update(self) -> Result<ProdutoUpdate, Vec<ErroCampo>> {
        let remover_foto = self.removerfoto;
        let campos = self.validar_campos()?;
        Ok(ProdutoUpdate {
            nome: campos.nome,
            preco: campos.preco,
            estoque: campos.estoque,
            ativo: campos.ativo,
            foto: campos.foto,
            remover_foto,
            categorias: campos.categorias,
        })
    }

    fn validar_campos(self) -> Result<CamposValidados, Vec<ErroCampo>> {
        let mut erros = Vec::new();

        let nome = match self.nome.as_deref().map(str::trim) {
            None | Some("") => {
                erros.push(ErroCampo::novo(
                    "nome",
                    "É obrigatório definir o nome do produto",
                ));
                String::new()
            }
            Some(n) if n.chars().count() > MAX_NOME_PRODUTO => {
                erros.push(ErroCampo::novo(
                    "nome",
                    format!("O produto pode ter até {MAX_NOME_PRODUTO} caracteres"),
                ));
                String::new()
            }
            Some(n) => n.to_string(),
        };

        let preco = match self.preco.as_deref().map(str::trim) {
            None | Some("") => {
                erros.push(ErroCampo::novo("preco", "É obrigatório definir o preço"));
                Decimal::ZERO
            }
            Some(raw) => match Decimal::from_str(raw) {
                Err(_) => {
                    erros.push(ErroCampo::novo("preco", "Preço inválido"));
                    Decimal::ZERO
                }
                Ok(valor) if valor < Decimal::ZERO => {
                    erros.push(ErroCampo::novo("preco", "Os preços devem ser positivos"));
                    Decimal::ZERO
                }
                Ok(valor) => {
                    // Canonical two decimal places
                    let mut preco = valor.round_dp(2);
                    preco.rescale(2);
                    preco
                }
            },
        };

        let estoque = match self.estoque.as_deref().map(str::trim) {
            None | Some("") => {
                erros.push(ErroCampo::novo("estoque", "É preciso definir o estoque"));
                0
            }
            Some(raw) => match raw.parse::<i64>() {
                Err(_) => {
                    erros.push(ErroCampo::novo("estoque", "Estoque inválido"));
                    0
                }
                Ok(valor) if valor < 0 => {
                    erros.push(ErroCampo::novo(
                        "estoque",
                        "O estoque precisa ser positivo",
                    ));
                    0
                }
                Ok(valor) => valor,
            },
        };

        let foto = match self.foto {
            None => None,
            Some(arquivo) => match validar_foto(&arquivo) {
                Ok(payload) => Some(payload),
                Err(erro) => {
                    erros.push(erro);
                    None
                }
            },
        };

        // Malformed ids are dropped; at least one valid selection is
        // required
        let categorias: Vec<i64> = self
            .categorias
            .iter()
            .filter_map(|v| parse_id(v))
            .collect::<BTreeSet<i64>>()
            .into_iter()
            .collect();
        if categorias.is_empty() {
            erros.push(ErroCampo::novo(
                "categorias",
                "Selecione pelo menos uma categoria",
            ));
        }

        if erros.is_empty() {
            Ok(CamposValidados {
                nome,
                preco,
                estoque,
                ativo: self.ativo,
                foto,
                categorias,
            })
        } else {
            Err(erros)
        }
    }
}

struct CamposValidados {
    nome: String,
    preco: Decimal,
    estoque: i64,
    ativo: bool,
    foto: Option<FotoPayload>,
    categorias: Vec<i64>,
}

/// HTML checkbox values
fn checkbox(valor: &str) -> bool {
    matches!(valor.trim(), "on" | "true" | "1" | "y")
}

async fn texto(field: axum::extract::multipart::Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))
}

fn validar_foto(arquivo: &ArquivoFoto) -> Result<FotoPayload, ErroCampo> {
    let extensao = arquivo
        .nome_arquivo
        .rsplit('.')
        .next()
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    if !EXTENSOES_FOTO.contains(&extensao.as_str()) {
        return Err(ErroCampo::novo("foto", "Apenas arquivos JPG ou PNG"));
    }

    let mime = match arquivo.content_type.as_deref() {
        Some(ct) if !ct.is_empty() => ct.to_string(),
        _ => match extensao.as_str() {
            "png" => "image/png".to_string(),
            _ => "image/jpeg".to_string(),
        },
    };

    Ok(FotoPayload {
        base64: BASE64.encode(&arquivo.dados),
        mime,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_valido() -> ProdutoForm {
        ProdutoForm {
            nome: Some("Arroz".into()),
            preco: Some("10.50".into()),
            estoque: Some("5".into()),
            ativo: true,
            foto: None,
            categorias: vec!["10".into()],
            removerfoto: false,
        }
    }

    #[test]
    fn formulario_valido_vira_payload() {
        let payload = form_valido().validar_create().unwrap();
        assert_eq!(payload.nome, "Arroz");
        assert_eq!(payload.preco.to_string(), "10.50");
        assert_eq!(payload.estoque, 5);
        assert_eq!(payload.categorias, vec![10]);
        assert!(payload.foto.is_none());
    }

    #[test]
    fn preco_e_normalizado_para_duas_casas() {
        let mut form = form_valido();
        form.preco = Some("10.5".into());
        assert_eq!(form.validar_create().unwrap().preco.to_string(), "10.50");

        let mut form = form_valido();
        form.preco = Some("3".into());
        assert_eq!(form.validar_create().unwrap().preco.to_string(), "3.00");
    }

    #[test]
    fn campos_obrigatorios_acumulam_erros() {
        let form = ProdutoForm::default();
        let erros = form.validar_create().unwrap_err();
        let campos: Vec<&str> = erros.iter().map(|e| e.campo).collect();
        assert!(campos.contains(&"nome"));
        assert!(campos.contains(&"preco"));
        assert!(campos.contains(&"estoque"));
        assert!(campos.contains(&"categorias"));
    }

    #[test]
    fn preco_negativo_e_rejeitado() {
        let mut form = form_valido();
        form.preco = Some("-1.00".into());
        let erros = form.validar_create().unwrap_err();
        assert_eq!(erros[0].campo, "preco");
        assert_eq!(erros[0].mensagem, "Os preços devem ser positivos");
    }

    #[test]
    fn estoque_negativo_e_rejeitado() {
        let mut form = form_valido();
        form.estoque = Some("-3".into());
        let erros = form.validar_create().unwrap_err();
        assert_eq!(erros[0].campo, "estoque");
    }

    #[test]
    fn categorias_malformadas_sao_descartadas() {
        let mut form = form_valido();
        form.categorias = vec!["7".into(), "abc".into(), "7".into(), "9".into()];
        let payload = form.validar_create().unwrap();
        assert_eq!(payload.categorias, vec![7, 9]);
    }

    #[test]
    fn somente_categorias_malformadas_e_erro() {
        let mut form = form_valido();
        form.categorias = vec!["abc".into(), "".into()];
        let erros = form.validar_create().unwrap_err();
        assert_eq!(erros[0].campo, "categorias");
        assert_eq!(erros[0].mensagem, "Selecione pelo menos uma categoria");
    }

    #[test]
    fn foto_com_extensao_proibida_e_rejeitada() {
        let mut form = form_valido();
        form.foto = Some(ArquivoFoto {
            nome_arquivo: "virus.gif".into(),
            content_type: Some("image/gif".into()),
            dados: vec![1, 2, 3],
        });
        let erros = form.validar_create().unwrap_err();
        assert_eq!(erros[0].campo, "foto");
        assert_eq!(erros[0].mensagem, "Apenas arquivos JPG ou PNG");
    }

    #[test]
    fn foto_valida_e_codificada_em_base64() {
        let mut form = form_valido();
        form.foto = Some(ArquivoFoto {
            nome_arquivo: "arroz.png".into(),
            content_type: Some("image/png".into()),
            dados: vec![0x89, 0x50, 0x4E, 0x47],
        });
        let payload = form.validar_create().unwrap();
        let foto = payload.foto.unwrap();
        assert_eq!(foto.mime, "image/png");
        assert_eq!(BASE64.decode(&foto.base64).unwrap(), vec![0x89, 0x50, 0x4E, 0x47]);
    }

    #[test]
    fn mime_cai_para_a_extensao_quando_ausente() {
        let mut form = form_valido();
        form.foto = Some(ArquivoFoto {
            nome_arquivo: "arroz.JPG".into(),
            content_type: None,
            dados: vec![1],
        });
        let payload = form.validar_create().unwrap();
        assert_eq!(payload.foto.unwrap().mime, "image/jpeg");
    }

    #[test]
    fn removerfoto_so_afeta_o_update() {
        let mut form = form_valido();
        form.removerfoto = true;
        let payload = form.validar_update().unwrap();
        assert!(payload.remover_foto);
    }

    #[test]
    fn checkbox_aceita_valores_html() {
        assert!(checkbox("on"));
        assert!(checkbox("true"));
        assert!(checkbox("1"));
        assert!(!checkbox("off"));
        assert!(!checkbox(""));
    }
}
