//! # bw-readmap
//!
//! 基于 Burrows-Wheeler 变换的 Rust 版读段映射器。
//!
//! 本 crate 对每条参考序列构建 FM 索引（后缀数组 + C 表 + O 表），把索引
//! 持久化为三份文本记录，并通过带编辑距离预算的递归反向搜索，枚举一条
//! 读段在预算内的全部比对（1 基位置 + CIGAR）：
//!
//! - **索引构建**：哨兵终止、后缀比较排序、逐序列动态字母表
//! - **索引持久化**：`.suffix_arrays` / `.c_tables` / `.o_tables` 文本记录，
//!   读回时逐序列校验名称与长度
//! - **近似搜索**：匹配 / 替换 / 删除 / 插入四分支递归，空区间即剪枝
//! - **SAM 输出**：最小字段的比对行
//!
//! ## 快速示例
//!
//! ```rust
//! use bw_readmap::index::FmIndex;
//! use bw_readmap::search::search_read;
//!
//! let fm = FmIndex::build("chr1", b"BANANA");
//! let hits = search_read(&fm, b"ANA", 0, false);
//! let mut positions: Vec<u32> = hits.iter().map(|h| h.pos).collect();
//! positions.sort_unstable();
//! assert_eq!(positions, vec![2, 4]); // 1 基位置，CIGAR 均为 "3M"
//! ```
//!
//! ## 模块说明
//!
//! - [`io`] — FASTA / FASTQ 解析与 SAM 行输出
//! - [`index`] — 后缀数组、C/O 表、FM 索引及其文本持久化
//! - [`search`] — 预算内近似反向搜索与 CIGAR 压缩

pub mod index;
pub mod io;
pub mod search;
