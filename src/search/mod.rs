//! 读段映射驱动：流式读取 FASTQ，对每条读段在每条参考序列的索引上做
//! 预算内反向搜索，把结果写成最小 SAM 行。
//!
//! 搜索之间无共享可变状态，索引只读，按批用 rayon 并行各读段的搜索；
//! 行的格式化在各自任务内完成，按输入顺序整批写出，输出顺序与单线程一致。

pub mod cigar;
pub mod engine;

pub use engine::{search_read, Hit};

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::io::Write;

use crate::index::fm::FmIndex;
use crate::io::fastq::{FastqReader, FastqRecord};
use crate::io::sam;

/// 一批并行处理的读段数
const BATCH: usize = 1024;

#[derive(Debug, Clone, Copy)]
pub struct MapOpt {
    /// 最大编辑距离
    pub max_edits: usize,
    /// 匹配 / 错配记 = / X 而不是统一的 M
    pub extended_cigar: bool,
    pub threads: usize,
}

/// 映射整个 FASTQ 文件。`indexes` 与参考文件的序列顺序一致。
pub fn map_fastq(
    indexes: &[FmIndex],
    reads_path: &str,
    out_path: Option<&str>,
    opt: MapOpt,
) -> Result<()> {
    let fq = std::fs::File::open(reads_path)
        .with_context(|| format!("cannot open reads FASTQ '{reads_path}'"))?;
    let mut reader = FastqReader::new(std::io::BufReader::new(fq));

    let mut out: Box<dyn Write> = if let Some(p) = out_path {
        Box::new(std::io::BufWriter::new(
            std::fs::File::create(p).with_context(|| format!("cannot create '{p}'"))?,
        ))
    } else {
        Box::new(std::io::BufWriter::new(std::io::stdout()))
    };

    sam::write_header(&mut out, indexes)?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(opt.threads.max(1))
        .build()
        .context("cannot build thread pool")?;

    let mut batch: Vec<FastqRecord> = Vec::with_capacity(BATCH);
    loop {
        batch.clear();
        while batch.len() < BATCH {
            match reader.next_record()? {
                Some(rec) => batch.push(rec),
                None => break,
            }
        }
        if batch.is_empty() {
            break;
        }

        let chunks: Vec<String> = pool.install(|| {
            batch
                .par_iter()
                .map(|rec| format_read_alignments(indexes, rec, opt))
                .collect()
        });
        for chunk in &chunks {
            out.write_all(chunk.as_bytes())?;
        }
    }

    out.flush()?;
    Ok(())
}

/// 一条读段对全部参考序列的比对行（可能为空串：无比对则不输出任何行）。
fn format_read_alignments(indexes: &[FmIndex], rec: &FastqRecord, opt: MapOpt) -> String {
    let mut lines = String::new();
    for fm in indexes {
        for hit in engine::search_read(fm, &rec.seq, opt.max_edits, opt.extended_cigar) {
            sam::push_line(&mut lines, &rec.name, &fm.name, &hit, &rec.seq, &rec.qual);
        }
    }
    lines
}
