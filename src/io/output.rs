use anyhow::Context;
use chrono::{DateTime, Local, TimeZone};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Result, VerCalcError};
use crate::processing::coil_list::{SelectedCoil, SelectedCoilList, VerSummary};
use crate::utils::utils::to_fixed;

pub const EXPORT_PREFIX: &str = "vercalc_export";

const BOM: &str = "\u{feff}";
const COLUMNS: usize = 9;
const HEADERS: [&str; COLUMNS] = [
    "使用順",
    "メーカー",
    "コイル名",
    "一次径(mm)",
    "二次径(mm)",
    "長さ(cm)",
    "体積(mm³)",
    "AZUR膨潤後体積(mm³)",
    "備考",
];
const SWELLING_REMARK: &str = "AZUR膨潤コイル";
const SWELLING_PRESENT_REMARK: &str = "AZUR膨潤コイル含む";

type Row = [String; COLUMNS];

fn blank_row() -> Row {
    Default::default()
}

fn entry_row(entry: &SelectedCoil) -> Row {
    let coil = &entry.coil;
    [
        entry.order.to_string(),
        coil.manufacturer.clone(),
        coil.coil_name.clone(),
        to_fixed(coil.primary_diameter_mm, 3),
        to_fixed(coil.secondary_diameter_mm, 1),
        to_fixed(coil.length_cm, 1),
        to_fixed(coil.volume_mm3, 1),
        coil.swelling_volume().map(|v| to_fixed(v, 1)).unwrap_or_default(),
        if coil.is_azur_series { SWELLING_REMARK.to_string() } else { String::new() },
    ]
}

fn summary_rows(summary: &VerSummary) -> Vec<Row> {
    let mut rows = vec![blank_row()];

    let mut total = blank_row();
    total[1] = "合計".to_string();
    total[2] = format!("{}本", summary.entry_count);
    total[6] = to_fixed(summary.total_pre_swelling_volume, 1);
    total[7] = to_fixed(summary.total_effective_volume, 1);
    if summary.has_swelling_series {
        total[8] = SWELLING_PRESENT_REMARK.to_string();
    }
    rows.push(total);

    if let (Some(ver), Some(pre_ver)) = (summary.ver, summary.pre_swelling_ver) {
        rows.push(blank_row());

        let mut aneurysm = blank_row();
        aneurysm[1] = "動脈瘤体積".to_string();
        aneurysm[2] = format!("{} mm³", to_fixed(summary.aneurysm_volume, 1));
        rows.push(aneurysm);

        let mut ver_row = blank_row();
        ver_row[1] = "VER".to_string();
        ver_row[2] = format!("{}%", to_fixed(ver, 1));
        if summary.has_swelling_series {
            ver_row[7] = format!("膨潤前: {}%", to_fixed(pre_ver, 1));
        }
        rows.push(ver_row);
    }
    rows
}

/// Renders the selection as the BOM-prefixed CSV sheet.
///
/// The header is written bare, every data cell is quoted, rows are separated
/// by `\n` and the text carries no trailing newline.
pub fn build_csv(list: &SelectedCoilList, aneurysm_volume: f64) -> Result<String> {
    let mut header = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    header.write_record(HEADERS)?;
    let buffer = header.into_inner().map_err(|e| VerCalcError::Io(e.into_error()))?;

    let mut body = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(buffer);
    for entry in list.display_entries() {
        body.write_record(&entry_row(entry))?;
    }
    if !list.is_empty() {
        for row in summary_rows(&list.summary(aneurysm_volume)) {
            body.write_record(&row)?;
        }
    }
    let mut bytes = body.into_inner().map_err(|e| VerCalcError::Io(e.into_error()))?;

    if bytes.last() == Some(&b'\n') {
        bytes.pop();
    }
    let text = String::from_utf8(bytes).map_err(|e| VerCalcError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))?;
    Ok(format!("{}{}", BOM, text))
}

/// `<prefix>_YYYYMMDD_HHMM.csv` for the given local time.
pub fn export_file_name<Tz: TimeZone>(prefix: &str, at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{}_{}.csv", prefix, at.format("%Y%m%d_%H%M"))
}

/// Writes the sheet into `output_dir`, stamped with the current local time.
pub fn write_export(
    output_dir: impl AsRef<Path>,
    prefix: &str,
    list: &SelectedCoilList,
    aneurysm_volume: f64,
) -> anyhow::Result<PathBuf> {
    let output_dir = output_dir.as_ref();
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Could not create output directory: {:?}", output_dir))?;

    let csv = build_csv(list, aneurysm_volume).context("Failed to render CSV export")?;
    let path = output_dir.join(export_file_name(prefix, &Local::now()));
    std::fs::write(&path, csv).with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::info!(path = %path.display(), entries = list.len(), "exported coil list");
    Ok(path)
}
