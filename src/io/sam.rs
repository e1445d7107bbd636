//! 最小 SAM 输出：`@SQ` 头行加每条比对一行
//! `(qname, 0, rname, 1 基位置, 255, cigar, *, 0, 0, seq, qual)`。

use anyhow::Result;
use std::fmt::Write as _;
use std::io::Write;

use crate::index::fm::FmIndex;
use crate::search::engine::Hit;

/// 每条参考序列一行 `@SQ`（LN 为真实序列长度，不含哨兵）。
pub fn write_header(out: &mut dyn Write, indexes: &[FmIndex]) -> Result<()> {
    for fm in indexes {
        writeln!(out, "@SQ\tSN:{}\tLN:{}", fm.name, fm.seq_len())?;
    }
    Ok(())
}

/// 追加一行比对记录到字符串缓冲（供批量并行格式化使用）。
pub fn push_line(buf: &mut String, qname: &str, rname: &str, hit: &Hit, seq: &[u8], qual: &[u8]) {
    let _ = writeln!(
        buf,
        "{}\t0\t{}\t{}\t255\t{}\t*\t0\t0\t{}\t{}",
        qname,
        rname,
        hit.pos,
        hit.cigar,
        String::from_utf8_lossy(seq),
        String::from_utf8_lossy(qual),
    );
}
