//! PDF tools

use super::{blocking, routed_zip, source_files};
use crate::download::{attachment, zip_attachment, DOCX, PDF, TEXT};
use crate::error::ServerError;
use crate::upload::Form;
use crate::AppState;
use axum::{
    extract::{Multipart, State},
    response::Response,
    Json,
};
use batch_core::{sequential_names, ExtensionPolicy, Mapping};
use pdf_ops::PdfInfo;
use std::iter;
use tracing::info;
use translate_core::{translate_pages_to_docx, TranslateOptions};

/// POST /api/pdf/merge
///
/// Documents are merged in upload order.
pub async fn handle_merge(multipart: Multipart) -> Result<Response, ServerError> {
    let mut form = Form::read(multipart).await?;
    let files = form.require_files("files")?;
    let count = files.len();

    let merged = blocking(move || {
        let documents = files.into_iter().map(|f| f.bytes).collect();
        Ok(pdf_ops::merge_documents(documents)?)
    })
    .await?;

    info!(documents = count, bytes = merged.len(), "merged PDFs");
    Ok(attachment("merged.pdf", PDF, merged))
}

/// POST /api/pdf/split
///
/// Without `ranges` every page becomes its own file in a ZIP; with `ranges`
/// (e.g. `1-3, 5`) the listed pages are kept in one PDF.
pub async fn handle_split(multipart: Multipart) -> Result<Response, ServerError> {
    let mut form = Form::read(multipart).await?;
    let file = form.require_file("file")?;
    let ranges = form.text("ranges").map(str::to_string);

    match ranges {
        None => {
            let pages = blocking(move || Ok(pdf_ops::split_into_pages(&file.bytes)?)).await?;
            info!(pages = pages.len(), "split into single pages");
            zip_attachment("pages.zip", pages)
        }
        Some(ranges) => {
            let split = blocking(move || {
                let page_count = pdf_ops::get_page_count(&file.bytes)?;
                let pages = pdf_ops::parse_ranges(&ranges, page_count)?;
                Ok(pdf_ops::split_document(&file.bytes, pages)?)
            })
            .await?;
            Ok(attachment("split.pdf", PDF, split))
        }
    }
}

/// POST /api/pdf/info
pub async fn handle_info(multipart: Multipart) -> Result<Json<PdfInfo>, ServerError> {
    let mut form = Form::read(multipart).await?;
    let file = form.require_file("file")?;
    let info = blocking(move || Ok(pdf_ops::inspect(&file.bytes)?)).await?;
    Ok(Json(info))
}

/// POST /api/pdf/reorder
///
/// `order` is the new page sequence, e.g. `3, 1, 2`; unlisted pages are dropped.
pub async fn handle_reorder(multipart: Multipart) -> Result<Response, ServerError> {
    let mut form = Form::read(multipart).await?;
    let file = form.require_file("file")?;
    let order = form.require_text("order")?.to_string();

    let reordered = blocking(move || {
        let page_count = pdf_ops::get_page_count(&file.bytes)?;
        let order = pdf_ops::parse_page_order(&order, page_count)?;
        Ok(pdf_ops::reorder_pages(&file.bytes, &order)?)
    })
    .await?;
    Ok(attachment("pdf_reordered.pdf", PDF, reordered))
}

/// POST /api/pdf/rotate
///
/// `angle` defaults to 90; `pages` defaults to every page.
pub async fn handle_rotate(multipart: Multipart) -> Result<Response, ServerError> {
    let mut form = Form::read(multipart).await?;
    let file = form.require_file("file")?;
    let angle: i64 = form.parse_or("angle", 90)?;
    let pages = form.text("pages").map(str::to_string);

    let rotated = blocking(move || {
        let pages = match pages {
            Some(pages) => {
                let page_count = pdf_ops::get_page_count(&file.bytes)?;
                pdf_ops::parse_ranges(&pages, page_count)?
            }
            None => Vec::new(),
        };
        Ok(pdf_ops::rotate_pages(&file.bytes, angle, &pages)?)
    })
    .await?;
    Ok(attachment("rotated.pdf", PDF, rotated))
}

/// POST /api/pdf/encrypt
pub async fn handle_encrypt(multipart: Multipart) -> Result<Response, ServerError> {
    let mut form = Form::read(multipart).await?;
    let file = form.require_file("file")?;
    let password = form.require_text("password")?.to_string();
    let owner_password = form.text("owner_password").map(str::to_string);

    let encrypted = blocking(move || {
        Ok(pdf_ops::encrypt_document(
            &file.bytes,
            &password,
            owner_password.as_deref(),
        )?)
    })
    .await?;
    Ok(attachment("encrypted.pdf", PDF, encrypted))
}

/// POST /api/pdf/extract-text
pub async fn handle_extract_text(multipart: Multipart) -> Result<Response, ServerError> {
    let mut form = Form::read(multipart).await?;
    let file = form.require_file("file")?;
    let text = blocking(move || Ok(pdf_ops::extract_text(&file.bytes)?)).await?;
    Ok(attachment("extracted_text.txt", TEXT, text.into_bytes()))
}

/// POST /api/pdf/translate
///
/// Chunks are sent one at a time with the configured pause in between, so
/// long documents take a while.
pub async fn handle_translate(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, ServerError> {
    let mut form = Form::read(multipart).await?;
    let file = form.require_file("file")?;
    let options = TranslateOptions::new(
        form.text("source").unwrap_or("auto"),
        form.require_text("target")?,
    )?
    .with_delay(state.translate_delay);

    let pages = blocking(move || Ok(pdf_ops::extract_page_texts(&file.bytes)?)).await?;
    info!(pages = pages.len(), source = %options.source, target = %options.target, "translating PDF");

    let docx = translate_pages_to_docx(&pages, state.translator.as_ref(), &options).await?;
    Ok(attachment(&options.file_name(), DOCX, docx))
}

/// POST /api/pdf/from-images
///
/// One page per image, in upload order.
pub async fn handle_from_images(multipart: Multipart) -> Result<Response, ServerError> {
    let mut form = Form::read(multipart).await?;
    let files = form.require_files("files")?;

    let pdf = blocking(move || {
        let images: Vec<Vec<u8>> = files.into_iter().map(|f| f.bytes).collect();
        Ok(pdf_ops::images_to_pdf(&images)?)
    })
    .await?;
    Ok(attachment("images_as_pdf.pdf", PDF, pdf))
}

/// POST /api/pdf/to-images
pub async fn handle_to_images(multipart: Multipart) -> Result<Response, ServerError> {
    let mut form = Form::read(multipart).await?;
    let file = form.require_file("file")?;
    let dpi: u32 = form.parse_or("dpi", pdf_ops::raster::DEFAULT_DPI)?;

    let pages = blocking(move || Ok(pdf_ops::render_pages(&file.bytes, dpi)?)).await?;
    info!(pages = pages.len(), dpi, "rendered PDF pages");
    zip_attachment("pdf_images.zip", pages)
}

/// POST /api/pdf/rename/sequential
///
/// Files are renamed `prefix_NNN.pdf` in upload order.
pub async fn handle_rename_sequential(multipart: Multipart) -> Result<Response, ServerError> {
    let mut form = Form::read(multipart).await?;
    let files = form.require_files("files")?;
    let prefix = form.require_text("prefix")?;
    let start: u32 = form.parse_or("start", batch_core::rename::DEFAULT_START)?;

    let names = sequential_names(prefix, start, iter::repeat(Some("pdf")).take(files.len()))?;
    zip_attachment(
        "pdf_renamed.zip",
        names.into_iter().zip(files.into_iter().map(|f| f.bytes)),
    )
}

/// POST /api/pdf/rename/mapping
///
/// `mapping` holds old/new name columns; `.pdf` is appended when missing.
pub async fn handle_rename_mapping(multipart: Multipart) -> Result<Response, ServerError> {
    let mut form = Form::read(multipart).await?;
    let table = super::read_table(&form.require_file("mapping")?)?;
    let files = source_files(form.require_files("files")?);

    blocking(move || {
        let mapping = Mapping::for_rename(&table, ExtensionPolicy::ForcePdf)?;
        routed_zip(&mapping, &files, "pdf_renamed.zip")
    })
    .await
}
