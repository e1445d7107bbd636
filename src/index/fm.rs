use crate::index::{sa, tables};

/// 哨兵符号：字节序小于任何实际符号，终止每条序列使所有后缀可比。
pub const SENTINEL: u8 = 0;

/// 单条参考序列的 FM 索引：
/// - 完整后缀数组（含哨兵位，长度 = |序列| + 1）
/// - 按首次出现顺序的动态字母表与 C 表（原始计数）
/// - 行优先展平的 O 表：`occ[row * len + i]` = BWT\[0..=i\] 中该符号的出现次数
///
/// 构建完成后全部只读，可跨搜索安全共享。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FmIndex {
    pub name: String,
    /// |序列| + 1（含哨兵）
    pub len: usize,
    pub sa: Vec<u32>,
    /// 字母表，按构建时首次出现顺序（含哨兵）
    pub alphabet: Vec<u8>,
    /// C 表：与 alphabet 平行的原始出现计数
    pub counts: Vec<u32>,
    /// O 表，|alphabet| × len，行优先
    pub occ: Vec<u32>,
    /// 派生量：字节序更小的符号的计数之和（即该符号块在 SA 中的起始行），
    /// 由 counts 重算，不参与持久化
    less: Vec<u32>,
}

impl FmIndex {
    /// 从参考序列构建索引（追加哨兵、排序后缀、导出两张表）。
    pub fn build(name: &str, seq: &[u8]) -> Self {
        let mut text = Vec::with_capacity(seq.len() + 1);
        text.extend_from_slice(seq);
        text.push(SENTINEL);
        let sa = sa::build_sa(&text);
        let (alphabet, counts, occ) = tables::build_tables(&text, &sa);
        Self::from_parts(name.to_string(), sa, alphabet, counts, occ)
    }

    /// 由已有部件组装（构建与反序列化共用），并重算派生的 less 偏移。
    pub fn from_parts(
        name: String,
        sa: Vec<u32>,
        alphabet: Vec<u8>,
        counts: Vec<u32>,
        occ: Vec<u32>,
    ) -> Self {
        let len = sa.len();
        let less = alphabet
            .iter()
            .map(|&b| {
                alphabet
                    .iter()
                    .zip(&counts)
                    .filter(|&(&a, _)| a < b)
                    .map(|(_, &c)| c)
                    .sum()
            })
            .collect();
        Self { name, len, sa, alphabet, counts, occ, less }
    }

    /// 真实序列长度（不含哨兵）。
    #[inline]
    pub fn seq_len(&self) -> usize {
        self.len - 1
    }

    #[inline]
    fn occ_at(&self, row: usize, i: usize) -> u32 {
        self.occ[row * self.len + i]
    }

    /// 向左扩展：在闭区间 [l, r] 上扩展字母表第 `row` 个符号，
    /// 返回新的闭区间；区间为空时返回 None（分支剪枝）。
    ///
    /// l' = less + O(row, l-1)（l == 0 时取 0），r' = less + O(row, r) - 1。
    #[inline]
    pub fn extend_left(&self, row: usize, l: usize, r: usize) -> Option<(usize, usize)> {
        let base = self.less[row] as usize;
        let o_l = if l == 0 { 0 } else { self.occ_at(row, l - 1) as usize };
        let o_r = self.occ_at(row, r) as usize;
        let nl = base + o_l;
        let nr = (base + o_r).checked_sub(1)?;
        (nl <= nr).then_some((nl, nr))
    }

    /// 符号在字母表中的行号。
    #[inline]
    pub fn row_of(&self, b: u8) -> Option<usize> {
        self.alphabet.iter().position(|&a| a == b)
    }

    /// 精确反向搜索：返回匹配 `pat` 的后缀的 SA 闭区间。
    /// 仅用于精确路径与测试；近似搜索见 [`crate::search`]。
    pub fn backward_search(&self, pat: &[u8]) -> Option<(usize, usize)> {
        if self.len == 0 || pat.is_empty() {
            return None;
        }
        let mut l = 0usize;
        let mut r = self.len - 1;
        for &a in pat.iter().rev() {
            let row = self.row_of(a)?;
            let (nl, nr) = self.extend_left(row, l, r)?;
            l = nl;
            r = nr;
        }
        Some((l, r))
    }
}
