//! C 表与 O 表构建。
//!
//! C 表按符号首次出现顺序记录每个符号的原始出现次数（字母表顺序即由此固定，
//! 每条序列各自持有，无任何全局符号表假设）；O 表是 BWT 列上的秩表：
//! `occ[row * n + i]` = 字母表第 `row` 个符号在 BWT\[0..=i\] 中的出现次数。

/// 从文本与后缀数组导出 (字母表, C 表, O 表)。
/// 文本必须以哨兵（字节 0）结尾；哨兵计入字母表且恰好出现一次。
pub fn build_tables(text: &[u8], sa: &[u32]) -> (Vec<u8>, Vec<u32>, Vec<u32>) {
    let n = text.len();

    // 字母表 + 计数，按首次出现顺序；256 槽只是构建期的临时查找，
    // 产出的结构全部按实际字母表动态定长。
    let mut slot = [usize::MAX; 256];
    let mut alphabet: Vec<u8> = Vec::new();
    let mut counts: Vec<u32> = Vec::new();
    for &b in text {
        let s = &mut slot[b as usize];
        if *s == usize::MAX {
            *s = alphabet.len();
            alphabet.push(b);
            counts.push(0);
        }
        counts[*s] += 1;
    }

    // BWT 列：行 i 的前驱字符为 text[sa[i]-1]，sa[i] == 0 时回绕到哨兵
    // （文本末尾恰好就是哨兵）。该约定必须与搜索端的区间收缩公式一致。
    let mut occ = vec![0u32; alphabet.len() * n];
    let mut running = vec![0u32; alphabet.len()];
    for (i, &p) in sa.iter().enumerate() {
        let prev = if p == 0 { text[n - 1] } else { text[p as usize - 1] };
        running[slot[prev as usize]] += 1;
        for (row, &r) in running.iter().enumerate() {
            occ[row * n + i] = r;
        }
    }

    (alphabet, counts, occ)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::sa::build_sa;

    fn build(seq: &[u8]) -> (Vec<u8>, Vec<u8>, Vec<u32>, Vec<u32>) {
        let mut text = seq.to_vec();
        text.push(0);
        let sa = build_sa(&text);
        let (alphabet, counts, occ) = build_tables(&text, &sa);
        (text, alphabet, counts, occ)
    }

    #[test]
    fn alphabet_in_first_encounter_order() {
        let (_, alphabet, counts, _) = build(b"BANANA");
        assert_eq!(alphabet, vec![b'B', b'A', b'N', 0]);
        assert_eq!(counts, vec![1, 3, 2, 1]);
    }

    #[test]
    fn sentinel_counted_once() {
        let (_, alphabet, counts, _) = build(b"AAAA");
        let i = alphabet.iter().position(|&b| b == 0).unwrap();
        assert_eq!(counts[i], 1);
    }

    #[test]
    fn occ_matches_naive_rank() {
        let (text, alphabet, _, occ) = build(b"BANANA");
        let n = text.len();
        let sa = build_sa(&text);

        // 朴素 BWT 列
        let bwt: Vec<u8> = sa
            .iter()
            .map(|&p| if p == 0 { text[n - 1] } else { text[p as usize - 1] })
            .collect();

        for (row, &sym) in alphabet.iter().enumerate() {
            let mut rank = 0u32;
            for i in 0..n {
                if bwt[i] == sym {
                    rank += 1;
                }
                assert_eq!(occ[row * n + i], rank, "sym={} i={}", sym, i);
            }
        }
    }

    #[test]
    fn occ_dimensions() {
        let (text, alphabet, _, occ) = build(b"ACGTACGT");
        assert_eq!(occ.len(), alphabet.len() * text.len());
    }

    #[test]
    fn counts_sum_to_text_len() {
        let (text, _, counts, _) = build(b"ABABAB");
        assert_eq!(counts.iter().sum::<u32>() as usize, text.len());
    }
}
