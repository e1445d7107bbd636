use anyhow::{anyhow, Result};
use std::io::BufRead;

/// 一条读段：名称、序列、质量串（三者由外部迭代逐条供给搜索）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastqRecord {
    pub name: String,
    pub seq: Vec<u8>,
    pub qual: Vec<u8>,
}

pub struct FastqReader<R: BufRead> {
    reader: R,
    buf: String,
    done: bool,
}

impl<R: BufRead> FastqReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, buf: String::new(), done: false }
    }

    /// 读取下一条记录；文件内容不合法时返回错误，已读出的记录不受影响。
    pub fn next_record(&mut self) -> Result<Option<FastqRecord>> {
        if self.done {
            return Ok(None);
        }

        // '@' 头行
        self.buf.clear();
        let mut n = self.reader.read_line(&mut self.buf)?;
        if n == 0 {
            self.done = true;
            return Ok(None);
        }
        if !self.buf.starts_with('@') {
            return Err(anyhow!("FASTQ header not starting with '@'"));
        }
        let name = self.buf[1..]
            .split_whitespace()
            .next()
            .unwrap_or("")
            .to_string();

        // 序列行
        self.buf.clear();
        n = self.reader.read_line(&mut self.buf)?;
        if n == 0 {
            return Err(anyhow!("unexpected EOF after header"));
        }
        let seq = self.buf.trim_end().as_bytes().to_ascii_uppercase();

        // '+' 行
        self.buf.clear();
        n = self.reader.read_line(&mut self.buf)?;
        if n == 0 || !self.buf.starts_with('+') {
            return Err(anyhow!("missing '+' line"));
        }

        // 质量行
        self.buf.clear();
        n = self.reader.read_line(&mut self.buf)?;
        if n == 0 {
            return Err(anyhow!("missing quality line"));
        }
        let qual = self.buf.trim_end().as_bytes().to_vec();

        if qual.len() != seq.len() {
            return Err(anyhow!("seq/qual length mismatch for read '{name}'"));
        }

        Ok(Some(FastqRecord { name, seq, qual }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_records() {
        let data = b"@r1 desc\nacgt\n+\nIIII\n@r2\nAA\n+\n##\n";
        let mut r = FastqReader::new(Cursor::new(&data[..]));

        let r1 = r.next_record().unwrap().unwrap();
        assert_eq!(r1.name, "r1");
        assert_eq!(r1.seq, b"ACGT");
        assert_eq!(r1.qual, b"IIII");

        let r2 = r.next_record().unwrap().unwrap();
        assert_eq!(r2.name, "r2");
        assert!(r.next_record().unwrap().is_none());
    }

    #[test]
    fn rejects_length_mismatch() {
        let data = b"@r1\nACGT\n+\nII\n";
        let mut r = FastqReader::new(Cursor::new(&data[..]));
        assert!(r.next_record().is_err());
    }

    #[test]
    fn rejects_missing_plus_line() {
        let data = b"@r1\nACGT\nIIII\n";
        let mut r = FastqReader::new(Cursor::new(&data[..]));
        assert!(r.next_record().is_err());
    }
}
