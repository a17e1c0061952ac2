// ==========================================
// 垃圾清运车队调度 - 技师资质文件解析
// ==========================================
// 格式: 成对行
// - 奇数行: "<任意前缀> <名> <姓>"，取最后两个空白分隔的词
// - 偶数行: "<车型>"
// 文件末尾的空行忽略
// ==========================================

use crate::domain::staff::QualificationRecord;
use crate::importer::error::{ImportError, ImportResult};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

// ==========================================
// QualificationParser - 资质文件解析器
// ==========================================
pub struct QualificationParser;

impl QualificationParser {
    /// 从任意 BufRead 解析，按文件顺序返回记录
    pub fn parse<R: BufRead>(reader: R) -> ImportResult<Vec<QualificationRecord>> {
        let mut lines = Vec::new();
        for line in reader.lines() {
            lines.push(line?);
        }
        while lines.last().map(|l| l.trim().is_empty()).unwrap_or(false) {
            lines.pop();
        }

        let mut records = Vec::with_capacity(lines.len() / 2);
        for (pair_idx, pair) in lines.chunks(2).enumerate() {
            let name_line_no = pair_idx * 2 + 1;
            let (first_name, last_name) = Self::split_name(&pair[0], name_line_no)?;
            let truck_type = match pair.get(1) {
                Some(line) => line.trim(),
                None => {
                    return Err(ImportError::MissingTruckTypeLine {
                        line: name_line_no,
                    })
                }
            };
            records.push(QualificationRecord::new(first_name, last_name, truck_type));
        }
        Ok(records)
    }

    /// 从文件路径解析
    pub fn parse_file(path: &Path) -> ImportResult<Vec<QualificationRecord>> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }
        let file = File::open(path)?;
        Self::parse(BufReader::new(file))
    }

    fn split_name(line: &str, line_no: usize) -> ImportResult<(&str, &str)> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 2 {
            return Err(ImportError::MalformedNameLine {
                line: line_no,
                content: line.to_string(),
            });
        }
        Ok((tokens[tokens.len() - 2], tokens[tokens.len() - 1]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_pairs_in_order() {
        let text = "Certified technician Amy Lee\nA\nLevel 2 Bob Stone\nB\n\n";
        let records = QualificationParser::parse(Cursor::new(text)).unwrap();
        assert_eq!(
            records,
            vec![
                QualificationRecord::new("Amy", "Lee", "A"),
                QualificationRecord::new("Bob", "Stone", "B"),
            ]
        );
    }

    #[test]
    fn test_truck_type_is_trimmed() {
        let text = "x Amy Lee\n  Compactor  \n";
        let records = QualificationParser::parse(Cursor::new(text)).unwrap();
        assert_eq!(records[0].truck_type, "Compactor");
        assert_eq!(records[0].full_name(), "Amy Lee");
    }

    #[test]
    fn test_dangling_name_line() {
        let text = "x Amy Lee\nA\ny Bob Stone\n";
        let err = QualificationParser::parse(Cursor::new(text)).unwrap_err();
        assert!(matches!(err, ImportError::MissingTruckTypeLine { line: 3 }));
    }

    #[test]
    fn test_single_token_name_line() {
        let err = QualificationParser::parse(Cursor::new("Amy\nA\n")).unwrap_err();
        assert!(matches!(err, ImportError::MalformedNameLine { line: 1, .. }));
    }

    #[test]
    fn test_empty_feed() {
        assert!(QualificationParser::parse(Cursor::new("")).unwrap().is_empty());
    }
}
