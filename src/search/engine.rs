//! 近似反向搜索：在编辑距离预算内枚举一条读段的全部比对。
//!
//! 状态 = (剩余读段长度, SA 闭区间 [l, r], 剩余预算, 操作轨迹)。
//! 读段自右向左处理；四个分支依次为按字母表顺序的匹配 / 替换、
//! 按字母表顺序的删除（消耗参考不消耗读段）、插入（消耗读段不消耗参考）。
//! 区间收缩为空即剪枝，预算耗尽只允许精确延伸——两者都是常规控制流，
//! 不是错误。递归深度受 读段长度 + 预算 约束，总是有限。

use crate::index::fm::{FmIndex, SENTINEL};
use crate::search::cigar;

/// 一条比对结果：1 基参考位置与压缩后的 CIGAR。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Hit {
    pub pos: u32,
    pub cigar: String,
}

struct SearchCtx<'a> {
    fm: &'a FmIndex,
    read: &'a [u8],
    /// 匹配 / 错配标签：默认都记 M；扩展 CIGAR 记 = / X
    match_tag: u8,
    mismatch_tag: u8,
    hits: Vec<Hit>,
}

/// 在单条序列的索引上搜索一条读段，返回预算内的全部比对，
/// 顺序即递归枚举的访问顺序（不按位置全局排序，可能含重复路径）。
pub fn search_read(fm: &FmIndex, read: &[u8], max_edits: usize, extended_cigar: bool) -> Vec<Hit> {
    if read.is_empty() || fm.len == 0 {
        return Vec::new();
    }
    let (match_tag, mismatch_tag) = if extended_cigar { (b'=', b'X') } else { (b'M', b'M') };
    let mut ctx = SearchCtx { fm, read, match_tag, mismatch_tag, hits: Vec::new() };
    let mut trace = Vec::with_capacity(read.len() + max_edits);
    recurse(&mut ctx, read.len(), 0, fm.len - 1, max_edits, &mut trace);
    ctx.hits
}

/// 轨迹按 push → 递归 → pop 的纪律维护：每个分支只看到自己的后缀，
/// 兄弟分支互不可见；到达终端时再反转并压缩。
fn recurse(
    ctx: &mut SearchCtx<'_>,
    remaining: usize,
    l: usize,
    r: usize,
    budget: usize,
    trace: &mut Vec<u8>,
) {
    let fm = ctx.fm;

    if remaining == 0 {
        // 匹配到读段最左端：区间内每个 SA 行各报一条比对
        let reversed: Vec<u8> = trace.iter().rev().copied().collect();
        let cigar = cigar::simplify(&reversed);
        for i in l..=r {
            ctx.hits.push(Hit { pos: fm.sa[i] + 1, cigar: cigar.clone() });
        }
        return;
    }

    let a = ctx.read[remaining - 1];

    // 匹配 / 替换：按字母表顺序尝试每个符号（哨兵除外，读段不含哨兵，
    // 经哨兵延伸只会把比对挂到文本左端之外）
    for (row, &b) in fm.alphabet.iter().enumerate() {
        if b == SENTINEL {
            continue;
        }
        if let Some((nl, nr)) = fm.extend_left(row, l, r) {
            if b == a {
                trace.push(ctx.match_tag);
                recurse(ctx, remaining - 1, nl, nr, budget, trace);
                trace.pop();
            } else if budget > 0 {
                trace.push(ctx.mismatch_tag);
                recurse(ctx, remaining - 1, nl, nr, budget - 1, trace);
                trace.pop();
            }
        }
    }

    if budget > 0 {
        // 删除：跳过一个参考字符，不消耗读段。收缩为空只跳过该符号，
        // 继续枚举余下的字母表符号。
        for (row, &b) in fm.alphabet.iter().enumerate() {
            if b == SENTINEL {
                continue;
            }
            if let Some((nl, nr)) = fm.extend_left(row, l, r) {
                trace.push(b'D');
                recurse(ctx, remaining, nl, nr, budget - 1, trace);
                trace.pop();
            }
        }

        // 插入：消耗一个读段字符，不收缩区间
        trace.push(b'I');
        recurse(ctx, remaining - 1, l, r, budget - 1, trace);
        trace.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn hit_set(hits: &[Hit]) -> HashSet<(u32, String)> {
        hits.iter().map(|h| (h.pos, h.cigar.clone())).collect()
    }

    /// CIGAR 长度不变量：M/=/X/I 计数之和必须等于读段长度
    fn assert_cigar_laws(hits: &[Hit], read_len: usize) {
        for h in hits {
            let mut read_span = 0usize;
            let mut num = 0usize;
            for c in h.cigar.bytes() {
                if c.is_ascii_digit() {
                    num = num * 10 + (c - b'0') as usize;
                } else {
                    if matches!(c, b'M' | b'=' | b'X' | b'I') {
                        read_span += num;
                    }
                    num = 0;
                }
            }
            assert_eq!(read_span, read_len, "cigar {} breaks read-length law", h.cigar);
        }
    }

    #[test]
    fn exact_match_banana_ana() {
        // 场景：参考 BANANA，读段 ANA，d = 0 → 位置 2 和 4，CIGAR 均为 3M
        let fm = FmIndex::build("chr1", b"BANANA");
        let hits = search_read(&fm, b"ANA", 0, false);
        let mut positions: Vec<u32> = hits.iter().map(|h| h.pos).collect();
        positions.sort_unstable();
        assert_eq!(positions, vec![2, 4]);
        assert!(hits.iter().all(|h| h.cigar == "3M"));
        assert_cigar_laws(&hits, 3);
    }

    #[test]
    fn substitution_with_extended_cigar() {
        // 场景：参考 ABABAB，读段 ABX，d = 1 → "AB?" 处各有一次替换比对
        let fm = FmIndex::build("chr1", b"ABABAB");
        let hits = search_read(&fm, b"ABX", 1, true);
        let set = hit_set(&hits);
        assert!(set.contains(&(1, "2=1X".to_string())));
        assert!(set.contains(&(3, "2=1X".to_string())));
        // 位置 5 的 "AB" 之后是第 7 位（哨兵），替换分支不可达，只剩插入路径
        assert!(!set.contains(&(5, "2=1X".to_string())));
        assert!(set.contains(&(5, "2=1I".to_string())));
        assert_cigar_laws(&hits, 3);
    }

    #[test]
    fn substitution_with_plain_cigar_merges_to_match() {
        let fm = FmIndex::build("chr1", b"ABABAB");
        let hits = search_read(&fm, b"ABX", 1, false);
        // 默认标签下替换也记 M，与相邻匹配合并
        assert!(hit_set(&hits).contains(&(1, "3M".to_string())));
    }

    #[test]
    fn read_longer_than_reference_needs_gap() {
        // 场景：参考 AAAA，读段 AAAAA，d = 1。五个读段字符只能覆盖四个参考
        // 位置，必须有一步只消耗读段（I 段）；全部比对落在位置 1。
        let fm = FmIndex::build("chr1", b"AAAA");
        let hits = search_read(&fm, b"AAAAA", 1, false);
        assert!(!hits.is_empty());
        for h in &hits {
            assert_eq!(h.pos, 1);
            assert_eq!(h.cigar.bytes().filter(|&c| c == b'I').count(), 1, "{}", h.cigar);
        }
        assert_cigar_laws(&hits, 5);
    }

    #[test]
    fn deletion_skips_reference_character() {
        // 读段缺一个参考字符：ACGT 上比对 AGT，d = 1 应含删除路径 1M1D2M
        let fm = FmIndex::build("chr1", b"ACGT");
        let hits = search_read(&fm, b"AGT", 1, false);
        assert!(hit_set(&hits).contains(&(1, "1M1D2M".to_string())));
        assert_cigar_laws(&hits, 3);
    }

    #[test]
    fn deletion_loop_continues_past_empty_branch() {
        // 删除分支枚举到一个无法收缩的符号时必须继续循环而不是整体返回：
        // 参考里 C 在 G 之前出现（字母表顺序靠前），从 "GT" 的区间删除 C
        // 收缩为空，但随后的 G 删除路径仍须被枚举到。
        let fm = FmIndex::build("chr1", b"CCAGT");
        let hits = search_read(&fm, b"AT", 1, false);
        assert!(hit_set(&hits).contains(&(3, "1M1D1M".to_string())));
    }

    #[test]
    fn budget_monotonicity() {
        let fm = FmIndex::build("chr1", b"ACGTACGTTACG");
        let read = b"CGTA";
        for k in 0..2usize {
            let small = hit_set(&search_read(&fm, read, k, false));
            let large = hit_set(&search_read(&fm, read, k + 1, false));
            assert!(small.is_subset(&large), "k={k} not monotone");
        }
    }

    #[test]
    fn unknown_symbol_without_budget_finds_nothing() {
        // 读段含参考字母表之外的符号且无预算可替换 → 零结果，而非错误
        let fm = FmIndex::build("chr1", b"BANANA");
        assert!(search_read(&fm, b"AXA", 0, false).is_empty());
        assert!(!search_read(&fm, b"AXA", 1, false).is_empty());
    }

    #[test]
    fn zero_budget_permits_only_exact() {
        let fm = FmIndex::build("chr1", b"ACGTACGT");
        let hits = search_read(&fm, b"GTAC", 0, false);
        assert_eq!(hit_set(&hits), HashSet::from([(3, "4M".to_string())]));
    }

    #[test]
    fn empty_read_yields_nothing() {
        let fm = FmIndex::build("chr1", b"BANANA");
        assert!(search_read(&fm, b"", 2, false).is_empty());
    }
}
