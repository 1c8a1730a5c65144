//! Merging, frequency tables and fragment lookups over published cells.
//!
//! Every function here blocks on [`ResultCell::wait`] for the cells it reads,
//! so callers can start reporting as soon as the jobs are queued.

use std::{fmt, io::Write, sync::Arc};

use serde::Serialize;
use tracing::{info_span, warn};

use crate::{
    cell::ResultCell,
    cli::OutputFormat,
    config::RunConfig,
    error::KnucleotideError,
    kmer::{pack_fragment, unpack_to_string, EncodedSequence, KmerLength},
};

/// One row of a frequency table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frequency {
    pub fragment: String,
    pub count: u64,
    /// `100 * count / total`.
    pub percent: f64,
}

/// Frequencies of every distinct fragment of one length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyTable {
    pub k: usize,
    /// Number of windows the percentages are relative to.
    pub total: usize,
    pub rows: Vec<Frequency>,
}

/// Exact occurrence count of one fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FragmentCount {
    pub fragment: String,
    pub count: u64,
}

impl fmt::Display for FragmentCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.count, self.fragment)
    }
}

/// The complete output of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub frequencies: Vec<FrequencyTable>,
    pub counts: Vec<FragmentCount>,
}

/// Combines two cells of the same length into a new published cell.
///
/// The target's table is copied and every entry of the source is added to the
/// copy; both inputs stay untouched. The result keeps the target's offset.
pub fn merge_into(target: &ResultCell, source: &ResultCell) -> ResultCell {
    debug_assert_eq!(target.k(), source.k());
    let mut table = target.wait().clone();
    table.merge_from(source.wait());
    ResultCell::published(target.k(), target.offset(), table)
}

/// Merges every shard of length `k` into one cell covering all windows.
///
/// Shards are folded pairwise with [`merge_into`]. A length with a single
/// shard returns that shard itself. Returns `None` when there is no shard of
/// that length.
pub fn merge_shards(cells: &[Arc<ResultCell>], k: KmerLength) -> Option<Arc<ResultCell>> {
    let mut shards = cells.iter().filter(|cell| cell.k() == k);
    let first = Arc::clone(shards.next()?);
    Some(shards.fold(first, |merged, shard| {
        Arc::new(merge_into(&merged, shard))
    }))
}

/// Frequency rows of a cell, most frequent first, ties in alphabetical order.
pub fn frequencies(total: usize, cell: &ResultCell) -> Vec<Frequency> {
    let table = cell.wait();
    let k = cell.k();
    let mut rows = Vec::with_capacity(table.len());
    table.for_each(|key, count| {
        rows.push(Frequency {
            fragment: unpack_to_string(key, k),
            count,
            percent: percent(count, total),
        });
    });
    rows.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.fragment.cmp(&b.fragment))
    });
    rows
}

/// Renders [`frequencies`] as `"<fragment> <percent>"` lines, 3 decimals.
pub fn frequency_report(total: usize, cell: &ResultCell) -> String {
    render_rows(&frequencies(total, cell))
}

fn render_rows(rows: &[Frequency]) -> String {
    rows.iter()
        .map(|row| format!("{} {:.3}\n", row.fragment, row.percent))
        .collect()
}

/// Exact number of occurrences of `fragment`, summed over every offset shard
/// of its length.
///
/// Returns 0 when no cell counts that length.
pub fn count_fragment(
    cells: &[Arc<ResultCell>],
    fragment: &str,
) -> Result<u64, KnucleotideError> {
    let k = KmerLength::new(fragment.len())?;
    let key = pack_fragment(fragment.as_bytes())?;

    let mut shards = cells.iter().filter(|cell| cell.k() == k).peekable();
    if shards.peek().is_none() {
        warn!(fragment, k = k.get(), "no shards of this length were counted");
    }
    Ok(shards.map(|cell| cell.wait().get(key)).sum())
}

/// Renders [`count_fragment`] as `"<count>\t<fragment>"`.
pub fn count_report(
    cells: &[Arc<ResultCell>],
    fragment: &str,
) -> Result<String, KnucleotideError> {
    let count = FragmentCount {
        fragment: fragment.to_string(),
        count: count_fragment(cells, fragment)?,
    };
    Ok(count.to_string())
}

#[allow(clippy::cast_precision_loss)]
fn percent(count: u64, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 * 100.0 / total as f64
}

impl Report {
    /// Builds the report for `sequence` from its cells.
    ///
    /// The first two configured lengths get frequency tables, built from all
    /// of their offset shards; every query fragment gets an exact count.
    pub fn build(
        sequence: &EncodedSequence,
        cells: &[Arc<ResultCell>],
        config: &RunConfig,
    ) -> Result<Self, KnucleotideError> {
        let _span = info_span!("build_report", cells = cells.len()).entered();

        let frequencies = config
            .lengths
            .iter()
            .take(2)
            .filter_map(|&k| {
                let merged = merge_shards(cells, k)?;
                let total = sequence.window_count(k);
                Some(FrequencyTable {
                    k: k.get(),
                    total,
                    rows: frequencies(total, &merged),
                })
            })
            .collect();

        let counts = config
            .queries
            .iter()
            .map(|fragment| {
                Ok(FragmentCount {
                    fragment: fragment.clone(),
                    count: count_fragment(cells, fragment)?,
                })
            })
            .collect::<Result<_, KnucleotideError>>()?;

        Ok(Self {
            frequencies,
            counts,
        })
    }

    /// The text layout: each frequency table followed by a blank line, then
    /// one `"<count>\t<fragment>"` line per query.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for table in &self.frequencies {
            out.push_str(&render_rows(&table.rows));
            out.push('\n');
        }
        for count in &self.counts {
            out.push_str(&format!("{count}\n"));
        }
        out
    }

    /// Writes the report in `format` and flushes the writer.
    pub fn write<W: Write>(
        &self,
        mut writer: W,
        format: OutputFormat,
    ) -> Result<(), KnucleotideError> {
        match format {
            OutputFormat::Text => writer.write_all(self.to_text().as_bytes())?,
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut writer, self)?;
                writeln!(writer)?;
            }
        }
        writer.flush()?;
        Ok(())
    }
}
