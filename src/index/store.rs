//! 索引持久化：按参考文件前缀写出 / 读回三份文本记录。
//!
//! - `<prefix>.suffix_arrays`：每条序列一行，`名称 长度 偏移...`
//! - `<prefix>.c_tables`：每条序列一行，`名称 符号数 (符号字节 计数)...`，
//!   该行同时固定字母表顺序
//! - `<prefix>.o_tables`：每条序列一行，`名称 值数 秩...`（按 c_tables 的
//!   字母表顺序行优先展平）
//!
//! 三个文件中的序列顺序必须与构建时参考文件的序列顺序一致；读回时逐位校验
//! 名称与长度，任何不一致返回 [`StoreError::Mismatch`]，不留下部分可用的索引。

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};

use thiserror::Error;

use crate::index::fm::FmIndex;
use crate::io::fasta::FastaRecord;

const SA_SUFFIX: &str = ".suffix_arrays";
const C_SUFFIX: &str = ".c_tables";
const O_SUFFIX: &str = ".o_tables";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("index io error: {0}")]
    Io(#[from] std::io::Error),
    /// 索引文件内容损坏（行缺失、字段不可解析、数目不符）
    #[error("malformed index record in {file}: {reason}")]
    Format { file: String, reason: String },
    /// 持久化的索引与给定参考不对应（名称 / 长度 / 表维度不一致）
    #[error("index mismatch for sequence '{name}': {reason}")]
    Mismatch { name: String, reason: String },
}

fn format_err(file: &str, reason: impl Into<String>) -> StoreError {
    StoreError::Format { file: file.to_string(), reason: reason.into() }
}

fn mismatch_err(name: &str, reason: impl Into<String>) -> StoreError {
    StoreError::Mismatch { name: name.to_string(), reason: reason.into() }
}

/// 将一组索引写到 `<prefix>.{suffix_arrays,c_tables,o_tables}`。
/// 序列顺序即切片顺序，必须与参考文件一致。
pub fn write(indexes: &[FmIndex], prefix: &str) -> Result<(), StoreError> {
    let mut sa_out = BufWriter::new(File::create(format!("{prefix}{SA_SUFFIX}"))?);
    let mut c_out = BufWriter::new(File::create(format!("{prefix}{C_SUFFIX}"))?);
    let mut o_out = BufWriter::new(File::create(format!("{prefix}{O_SUFFIX}"))?);

    for fm in indexes {
        write!(sa_out, "{} {}", fm.name, fm.len)?;
        for &p in &fm.sa {
            write!(sa_out, " {p}")?;
        }
        writeln!(sa_out)?;

        write!(c_out, "{} {}", fm.name, fm.alphabet.len())?;
        for (&sym, &cnt) in fm.alphabet.iter().zip(&fm.counts) {
            write!(c_out, " {sym} {cnt}")?;
        }
        writeln!(c_out)?;

        write!(o_out, "{} {}", fm.name, fm.occ.len())?;
        for &v in &fm.occ {
            write!(o_out, " {v}")?;
        }
        writeln!(o_out)?;
    }

    sa_out.flush()?;
    c_out.flush()?;
    o_out.flush()?;
    Ok(())
}

struct RecordLines {
    file: String,
    lines: Vec<String>,
}

fn read_lines(path: String) -> Result<RecordLines, StoreError> {
    let f = File::open(&path)?;
    let mut lines = Vec::new();
    for line in BufReader::new(f).lines() {
        let line = line?;
        if !line.trim().is_empty() {
            lines.push(line);
        }
    }
    Ok(RecordLines { file: path, lines })
}

/// 解析一行 `名称 数目 值...`，校验名称与数目。
fn parse_line<'a>(
    rec: &'a RecordLines,
    i: usize,
    expected_name: &str,
) -> Result<(usize, std::str::SplitAsciiWhitespace<'a>), StoreError> {
    let line = rec
        .lines
        .get(i)
        .ok_or_else(|| mismatch_err(expected_name, format!("no record at position {i} in {}", rec.file)))?;
    let mut fields = line.split_ascii_whitespace();
    let name = fields
        .next()
        .ok_or_else(|| format_err(&rec.file, format!("empty record at position {i}")))?;
    if name != expected_name {
        return Err(mismatch_err(
            expected_name,
            format!("stored name '{name}' at position {i} in {}", rec.file),
        ));
    }
    let count: usize = fields
        .next()
        .ok_or_else(|| format_err(&rec.file, format!("missing count for '{name}'")))?
        .parse()
        .map_err(|_| format_err(&rec.file, format!("unparsable count for '{name}'")))?;
    Ok((count, fields))
}

fn parse_values<T: std::str::FromStr>(
    fields: std::str::SplitAsciiWhitespace<'_>,
    count: usize,
    file: &str,
    name: &str,
) -> Result<Vec<T>, StoreError> {
    let mut values = Vec::with_capacity(count);
    for field in fields {
        let v = field
            .parse::<T>()
            .map_err(|_| format_err(file, format!("unparsable value '{field}' for '{name}'")))?;
        values.push(v);
    }
    if values.len() != count {
        return Err(format_err(
            file,
            format!("'{name}' declares {count} values but carries {}", values.len()),
        ));
    }
    Ok(values)
}

/// 从 `<prefix>` 读回索引集，并逐序列校验与参考一致。
/// O 表依赖 c_tables 行固定的字母表顺序，必须先解析 C 表。
pub fn read(records: &[FastaRecord], prefix: &str) -> Result<Vec<FmIndex>, StoreError> {
    let sa_rec = read_lines(format!("{prefix}{SA_SUFFIX}"))?;
    let c_rec = read_lines(format!("{prefix}{C_SUFFIX}"))?;
    let o_rec = read_lines(format!("{prefix}{O_SUFFIX}"))?;

    let mut indexes = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let expected_len = rec.seq.len() + 1;

        // 后缀数组
        let (len, fields) = parse_line(&sa_rec, i, &rec.name)?;
        if len != expected_len {
            return Err(mismatch_err(
                &rec.name,
                format!("stored length {len}, reference expects {expected_len}"),
            ));
        }
        let sa: Vec<u32> = parse_values(fields, len, &sa_rec.file, &rec.name)?;

        // C 表（携带字母表顺序）
        let (n_symbols, fields) = parse_line(&c_rec, i, &rec.name)?;
        let pairs: Vec<u32> = parse_values(fields, n_symbols * 2, &c_rec.file, &rec.name)?;
        let mut alphabet = Vec::with_capacity(n_symbols);
        let mut counts = Vec::with_capacity(n_symbols);
        for pair in pairs.chunks_exact(2) {
            let sym = u8::try_from(pair[0])
                .map_err(|_| format_err(&c_rec.file, format!("symbol {} out of range", pair[0])))?;
            alphabet.push(sym);
            counts.push(pair[1]);
        }
        if counts.iter().sum::<u32>() as usize != expected_len {
            return Err(mismatch_err(
                &rec.name,
                format!("c-table totals {} positions, reference expects {expected_len}",
                    counts.iter().sum::<u32>()),
            ));
        }

        // O 表（字母表顺序已知后才能解读）
        let (n_values, fields) = parse_line(&o_rec, i, &rec.name)?;
        if n_values != n_symbols * expected_len {
            return Err(mismatch_err(
                &rec.name,
                format!(
                    "o-table carries {n_values} values, expected {} ({} symbols x {expected_len})",
                    n_symbols * expected_len,
                    n_symbols
                ),
            ));
        }
        let occ: Vec<u32> = parse_values(fields, n_values, &o_rec.file, &rec.name)?;

        indexes.push(FmIndex::from_parts(rec.name.clone(), sa, alphabet, counts, occ));
    }

    Ok(indexes)
}

/// 独立校验：从参考重建索引，与读回的索引逐项比较后缀数组，
/// 报告第一处不一致。
pub fn validate(records: &[FastaRecord], prefix: &str) -> Result<(), StoreError> {
    let stored = read(records, prefix)?;
    for (rec, fm) in records.iter().zip(&stored) {
        let rebuilt = FmIndex::build(&rec.name, &rec.seq);
        if rebuilt.len != fm.len {
            return Err(mismatch_err(
                &rec.name,
                format!("stored length {} but rebuild gives {}", fm.len, rebuilt.len),
            ));
        }
        for (i, (&a, &b)) in fm.sa.iter().zip(&rebuilt.sa).enumerate() {
            if a != b {
                return Err(mismatch_err(
                    &rec.name,
                    format!("suffix array disagrees at offset {i}: stored {a}, rebuilt {b}"),
                ));
            }
        }
    }
    Ok(())
}
