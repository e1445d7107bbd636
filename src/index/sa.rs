/// 构建后缀数组（朴素比较排序）。
/// 输入为带哨兵终止符的文本（哨兵 = 0，字节序小于任何其他符号），
/// 对所有后缀按完整字典序比较排序，返回起始偏移的排列。
/// 复杂度最坏 O(n² log n)：这是面向正确性的参考实现，适用于测试规模的
/// 参考序列；换成线性构建会改变本模块的预期复杂度档位，除非明确要求。
pub fn build_sa(text: &[u8]) -> Vec<u32> {
    let n = text.len();
    if n == 0 {
        return Vec::new();
    }
    let mut sa: Vec<u32> = (0..n as u32).collect();
    sa.sort_unstable_by(|&i, &j| text[i as usize..].cmp(&text[j as usize..]));
    sa
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_text(len: usize) -> Vec<u8> {
        let bases = [b'A', b'C', b'G', b'T', b'N'];
        let mut x: u32 = 1_234_567;
        let mut v = Vec::with_capacity(len + 1);
        for _ in 0..len {
            x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            v.push(bases[(x >> 16) as usize % bases.len()]);
        }
        v.push(0); // sentinel
        v
    }

    #[test]
    fn sa_banana() {
        // "BANANA" + 哨兵：后缀按字典序 $, A$, ANA$, ANANA$, BANANA$, NA$, NANA$
        let mut text = b"BANANA".to_vec();
        text.push(0);
        let sa = build_sa(&text);
        assert_eq!(sa, vec![6, 5, 3, 1, 0, 4, 2]);
    }

    #[test]
    fn sa_sentinel_sorts_first() {
        let mut text = b"ACGT".to_vec();
        text.push(0);
        let sa = build_sa(&text);
        assert_eq!(sa[0], 4);
        assert_eq!(sa.len(), text.len());
    }

    #[test]
    fn sa_is_sorted_permutation() {
        for len in 1..=32 {
            let text = make_text(len);
            let sa = build_sa(&text);

            // 排列性质
            let mut seen = vec![false; text.len()];
            for &p in &sa {
                assert!(!seen[p as usize], "duplicate offset at len={}", len);
                seen[p as usize] = true;
            }
            assert!(seen.iter().all(|&s| s));

            // 排序性质
            for w in sa.windows(2) {
                let a = &text[w[0] as usize..];
                let b = &text[w[1] as usize..];
                assert!(a <= b, "unsorted suffixes at len={}", len);
            }
        }
    }

    #[test]
    fn sa_rebuild_is_identical() {
        let text = make_text(40);
        assert_eq!(build_sa(&text), build_sa(&text));
    }

    #[test]
    fn sa_empty_text() {
        assert!(build_sa(&[]).is_empty());
    }
}
