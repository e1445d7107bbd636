/// 将逐字符操作标签序列（基因组从左到右顺序）游程压缩为 CIGAR 字符串。
/// 相邻且相同的标签合并计数；`M` 与 `=`/`X` 属不同标签，互不跨类合并。
pub fn simplify(trace: &[u8]) -> String {
    let mut out = String::new();
    let mut i = 0;
    while i < trace.len() {
        let op = trace[i];
        let mut run = 1;
        while i + run < trace.len() && trace[i + run] == op {
            run += 1;
        }
        out.push_str(&run.to_string());
        out.push(op as char);
        i += run;
    }
    out
}
