//! Listing semantics: category filter, deduplication, ordering and
//! pagination fallback.

mod common;

use common::{criar_categoria, criar_produto, pool};
use estoque_server::db::repository::produto;
use estoque_server::filtro;
use shared::models::PageSize;
use sqlx::SqlitePool;

async fn catalogo_basico(pool: &SqlitePool) -> (i64, i64, i64) {
    let bebidas = criar_categoria(pool, "Bebidas").await;
    let carnes = criar_categoria(pool, "Carnes").await;
    let padaria = criar_categoria(pool, "Padaria").await;

    criar_produto(pool, "Arroz", "10.50", 5, &[padaria]).await;
    criar_produto(pool, "Suco", "4.00", 10, &[bebidas]).await;
    criar_produto(pool, "Picanha", "89.90", 2, &[carnes]).await;

    (bebidas, carnes, padaria)
}

fn nomes(lista: &produto::ListaProdutos) -> Vec<&str> {
    lista.pagina.items.iter().map(|p| p.nome.as_str()).collect()
}

#[tokio::test]
async fn filtro_por_categoria_inclui_e_exclui() {
    let pool = pool().await;
    let (_, carnes, padaria) = catalogo_basico(&pool).await;

    // Filtered to Padaria: "Arroz" appears
    let lista = produto::lista(&pool, Some(&[padaria]), 1, PageSize::Limit(25))
        .await
        .unwrap();
    assert_eq!(nomes(&lista), vec!["Arroz"]);

    // Filtered to Carnes: "Arroz" is absent
    let lista = produto::lista(&pool, Some(&[carnes]), 1, PageSize::Limit(25))
        .await
        .unwrap();
    assert_eq!(nomes(&lista), vec!["Picanha"]);
}

#[tokio::test]
async fn selecao_completa_equivale_a_nao_filtrar() {
    let pool = pool().await;
    let (bebidas, carnes, padaria) = catalogo_basico(&pool).await;

    let sem_filtro = produto::lista(&pool, None, 1, PageSize::Limit(25))
        .await
        .unwrap();
    let com_todas = produto::lista(&pool, Some(&[bebidas, carnes, padaria]), 1, PageSize::Limit(25))
        .await
        .unwrap();

    assert_eq!(nomes(&sem_filtro), nomes(&com_todas));
    assert_eq!(sem_filtro.pagina.total, com_todas.pagina.total);
}

#[tokio::test]
async fn produtos_em_varias_categorias_aparecem_uma_vez() {
    let pool = pool().await;
    let bebidas = criar_categoria(&pool, "Bebidas").await;
    let padaria = criar_categoria(&pool, "Padaria").await;
    criar_produto(&pool, "Café com pão", "7.00", 1, &[bebidas, padaria]).await;

    let lista = produto::lista(&pool, Some(&[bebidas, padaria]), 1, PageSize::Limit(25))
        .await
        .unwrap();
    assert_eq!(lista.pagina.total, 1);
    assert_eq!(nomes(&lista), vec!["Café com pão"]);
}

#[tokio::test]
async fn ordenacao_e_sempre_por_nome() {
    let pool = pool().await;
    let cat = criar_categoria(&pool, "Padaria").await;
    criar_produto(&pool, "Rosca", "3.00", 1, &[cat]).await;
    criar_produto(&pool, "Broa", "2.00", 1, &[cat]).await;
    criar_produto(&pool, "Pão", "1.00", 1, &[cat]).await;

    let lista = produto::lista(&pool, None, 1, PageSize::Limit(25))
        .await
        .unwrap();
    assert_eq!(nomes(&lista), vec!["Broa", "Pão", "Rosca"]);
}

#[tokio::test]
async fn pp_all_devolve_tudo_em_uma_pagina() {
    let pool = pool().await;
    catalogo_basico(&pool).await;

    let lista = produto::lista(&pool, None, 1, PageSize::All).await.unwrap();
    assert_eq!(lista.pagina.items.len(), 3);
    assert_eq!(lista.pagina.total, 3);
    assert_eq!(lista.pagina.pages, 1);
    assert!(!lista.pagina.has_prev);
    assert!(!lista.pagina.has_next);
    assert!(!lista.pagina_corrigida);
}

#[tokio::test]
async fn paginacao_limitada() {
    let pool = pool().await;
    let cat = criar_categoria(&pool, "Padaria").await;
    for nome in ["A", "B", "C", "D", "E"] {
        criar_produto(&pool, nome, "1.00", 1, &[cat]).await;
    }

    let lista = produto::lista(&pool, None, 2, PageSize::Limit(2)).await.unwrap();
    assert_eq!(nomes(&lista), vec!["C", "D"]);
    assert_eq!(lista.pagina.total, 5);
    assert_eq!(lista.pagina.pages, 3);
    assert_eq!(lista.pagina.page, 2);
    assert!(lista.pagina.has_prev);
    assert!(lista.pagina.has_next);
}

#[tokio::test]
async fn pagina_fora_do_intervalo_volta_para_a_primeira() {
    let pool = pool().await;
    catalogo_basico(&pool).await;

    let primeira = produto::lista(&pool, None, 1, PageSize::Limit(2)).await.unwrap();
    let fora = produto::lista(&pool, None, 99, PageSize::Limit(2)).await.unwrap();

    // Page 1's contents, flagged for the corrective notice, not an error
    assert!(fora.pagina_corrigida);
    assert_eq!(fora.pagina.page, 1);
    assert_eq!(nomes(&fora), nomes(&primeira));

    // page below 1 gets the same treatment
    let negativa = produto::lista(&pool, None, 0, PageSize::Limit(2)).await.unwrap();
    assert!(negativa.pagina_corrigida);
    assert_eq!(negativa.pagina.page, 1);
}

#[tokio::test]
async fn catalogo_vazio_lista_sem_erro() {
    let pool = pool().await;
    criar_categoria(&pool, "Bebidas").await;

    let lista = produto::lista(&pool, None, 1, PageSize::Limit(25)).await.unwrap();
    assert!(lista.pagina.items.is_empty());
    assert_eq!(lista.pagina.total, 0);
    assert_eq!(lista.pagina.pages, 0);
    assert!(!lista.pagina_corrigida);
}

#[tokio::test]
async fn resolucao_do_filtro_contra_o_catalogo() {
    let pool = pool().await;
    let (bebidas, carnes, padaria) = catalogo_basico(&pool).await;
    let todas = vec![bebidas, carnes, padaria];

    // Submission with malformed ids keeps only the valid ones
    let enviadas = vec![padaria.to_string(), "nada".to_string()];
    let base = filtro::parse_selecao(&enviadas);
    let resolvido = filtro::resolver(&todas, &base);
    assert_eq!(resolvido.restricao, Some(vec![padaria]));

    let lista = produto::lista(
        &pool,
        resolvido.restricao.as_deref(),
        1,
        PageSize::Limit(25),
    )
    .await
    .unwrap();
    assert_eq!(nomes(&lista), vec!["Arroz"]);

    // Selecting every category resolves to no restriction
    let resolvido = filtro::resolver(&todas, &todas);
    assert_eq!(resolvido.restricao, None);
}

#[tokio::test]
async fn preco_sobrevive_ao_armazenamento() {
    let pool = pool().await;
    let cat = criar_categoria(&pool, "Padaria").await;
    let id = criar_produto(&pool, "Arroz", "10.50", 5, &[cat]).await;

    let p = produto::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(p.preco.to_string(), "10.50");
    assert_eq!(p.estoque, 5);
}
