use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use regex::Regex;
use tracing::info;

use crate::cli::PageIndexArgs;
use crate::model::{ConstitutionDocument, PageIndexFile, SectionId};
use crate::pdftext;
use crate::pipeline::{BoilerplateFilter, normalize_text, page_index_header_id};
use crate::util::{ensure_directory, write_json_pretty};

pub fn run(args: PageIndexArgs) -> Result<()> {
    let constants_source = fs::read_to_string(&args.constants_path)
        .with_context(|| format!("failed to read {}", args.constants_path.display()))?;
    let pdf_rel_path = pdf_path_from_constants(&constants_source)?;
    info!(pdf_path = %pdf_rel_path, "resolved canonical PDF path");

    let known_ids = load_section_ids(&args.sections_path)?;
    info!(
        sections = known_ids.len(),
        path = %args.sections_path.display(),
        "loaded section identifier set"
    );

    let pdf_file = match &args.local_pdf {
        Some(path) => path.clone(),
        None => {
            let urls_raw = fs::read(&args.urls_path)
                .with_context(|| format!("failed to read {}", args.urls_path.display()))?;
            let url = pdf_url_from_map(&urls_raw, &pdf_rel_path)
                .with_context(|| format!("failed to parse {}", args.urls_path.display()))?;
            download_pdf(&url, &args.cache_dir)?
        }
    };

    let pages = pdftext::extract_pages(&pdf_file, None)?;
    let index = build_page_index(&pages, &known_ids, &args.body_anchor)?;

    let output = PageIndexFile {
        pdf_path: pdf_rel_path,
        page_count: pages.len(),
        sections: index,
    };

    write_json_pretty(&args.out_path, &output)?;
    info!(
        sections = output.sections.len(),
        page_count = output.page_count,
        path = %args.out_path.display(),
        "wrote page index"
    );

    Ok(())
}

/// The consumer app declares the canonical relative PDF path as a string
/// constant; it is the key into the URL map and the `pdfPath` field of the
/// output.
fn pdf_path_from_constants(source: &str) -> Result<String> {
    let pattern = Regex::new(r#"CONSTITUTION_PDF_PATH\s*=\s*['"]([^'"]+)['"]"#)
        .context("failed to compile constants pattern")?;

    pattern
        .captures(source)
        .and_then(|captures| captures.get(1))
        .map(|value| value.as_str().to_string())
        .context("CONSTITUTION_PDF_PATH not found in constants source")
}

/// The URL table is either a bare object or wrapped under a `urls` key.
fn pdf_url_from_map(raw: &[u8], pdf_rel_path: &str) -> Result<String> {
    let value: serde_json::Value = serde_json::from_slice(raw)?;
    let table = value.get("urls").unwrap_or(&value);

    match table.get(pdf_rel_path).and_then(|url| url.as_str()) {
        Some(url) => Ok(url.to_string()),
        None => bail!("PDF path not found in URL map: {pdf_rel_path}"),
    }
}

fn load_section_ids(sections_path: &Path) -> Result<BTreeSet<SectionId>> {
    let raw = fs::read(sections_path)
        .with_context(|| format!("failed to read {}", sections_path.display()))?;
    let document: ConstitutionDocument = serde_json::from_slice(&raw)
        .with_context(|| format!("failed to parse {}", sections_path.display()))?;

    document
        .sections
        .iter()
        .map(|section| {
            section
                .section_number
                .parse()
                .map_err(|message: String| anyhow::anyhow!(message))
        })
        .collect()
}

fn download_pdf(url: &str, cache_dir: &Path) -> Result<PathBuf> {
    ensure_directory(cache_dir)?;
    let target = cache_dir.join("constitution.pdf");
    let safe_url = url.replace(' ', "%20");

    info!(url = %safe_url, "downloading source PDF");
    let response = ureq::get(&safe_url)
        .call()
        .with_context(|| format!("failed to download {safe_url}"))?;

    let mut reader = response.into_reader();
    let mut file = File::create(&target)
        .with_context(|| format!("failed to create {}", target.display()))?;
    std::io::copy(&mut reader, &mut file)
        .with_context(|| format!("failed to write {}", target.display()))?;

    info!(path = %target.display(), "downloaded source PDF");
    Ok(target)
}

/// Walks pages in order, recording the first body page on which each known
/// section header appears. Pages before the body anchor are skipped so
/// listing entries cannot shadow the real sections.
fn build_page_index(
    pages: &[String],
    known_ids: &BTreeSet<SectionId>,
    body_anchor: &str,
) -> Result<BTreeMap<SectionId, usize>> {
    let filter = BoilerplateFilter::new()?;
    let anchor = Regex::new(body_anchor)
        .with_context(|| format!("failed to compile body anchor pattern: {body_anchor}"))?;

    let mut index = BTreeMap::new();
    let mut body_started = false;

    for (page_number, page) in pages.iter().enumerate().map(|(i, page)| (i + 1, page)) {
        let text = filter.strip(&normalize_text(page));

        if !body_started && anchor.is_match(&text) {
            body_started = true;
            info!(page = page_number, "body start detected");
        }
        if !body_started {
            continue;
        }

        for line in text.lines() {
            let Some(id) = page_index_header_id(line) else {
                continue;
            };
            if known_ids.contains(&id) {
                index.entry(id).or_insert(page_number);
            }
        }
    }

    Ok(index)
}
