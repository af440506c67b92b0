use crate::keymap;
use crate::layout::{KeyDef, Layout};
use crate::types::Dimensions;
use anyhow::{anyhow, bail, Context, Result};
use std::path::Path;
use tracing::debug;

/// Load a keymap file. The format is line oriented: `;` starts a comment,
/// the first significant line is `ROWSxCOLS`, and each following line lists
/// one matrix row as whitespace-separated key names, `--` for positions
/// without a switch.
pub fn load_keymap<P: AsRef<Path>>(path: P) -> Result<Layout> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading keymap {}", path.display()))?;
    parse_keymap(&text).with_context(|| format!("parsing keymap {}", path.display()))
}

pub fn parse_keymap(content: &str) -> Result<Layout> {
    let mut lines = content.lines().enumerate().filter_map(|(i, line)| {
        let line = match line.find(';') {
            Some(pos) => &line[..pos],
            None => line,
        };
        let line = line.trim();
        if line.is_empty() {
            None
        } else {
            Some((i + 1, line))
        }
    });

    let (header_line, header) = lines.next().ok_or_else(|| anyhow!("keymap is empty"))?;
    let dims = parse_header(header).with_context(|| format!("line {header_line}"))?;
    debug!(rows = dims.rows, cols = dims.cols, "parsing keymap grid");

    let mut grid: Vec<Vec<KeyDef>> = Vec::with_capacity(dims.rows as usize);
    for (line_no, line) in lines {
        if grid.len() == dims.rows as usize {
            bail!("line {line_no}: expected {} key rows, found more", dims.rows);
        }
        let mut row = Vec::with_capacity(dims.cols as usize);
        for token in line.split_whitespace() {
            let def = keymap::lookup(token).ok_or_else(|| {
                anyhow!("line {line_no}: unknown key name {token:?} (column {})", row.len())
            })?;
            row.push(def);
        }
        if row.len() != dims.cols as usize {
            bail!(
                "line {line_no}: expected {} columns, found {}",
                dims.cols,
                row.len()
            );
        }
        grid.push(row);
    }
    if grid.len() != dims.rows as usize {
        bail!("expected {} key rows, found {}", dims.rows, grid.len());
    }

    // The text is row per line; key ids are column-major.
    let mut defs = vec![KeyDef::Unused; dims.key_count()];
    for (r, row) in grid.iter().enumerate() {
        for (c, def) in row.iter().enumerate() {
            defs[dims.key_id(r as u8, c as u8).index()] = *def;
        }
    }

    Ok(Layout::new(dims, defs)?)
}

fn parse_header(header: &str) -> Result<Dimensions> {
    let (rows, cols) = header
        .split_once('x')
        .ok_or_else(|| anyhow!("header must be ROWSxCOLS, got {header:?}"))?;
    let rows: u8 = rows
        .trim()
        .parse()
        .with_context(|| format!("row count in header {header:?}"))?;
    let cols: u8 = cols
        .trim()
        .parse()
        .with_context(|| format!("column count in header {header:?}"))?;
    Ok(Dimensions::new(rows, cols))
}
