use std::sync::OnceLock;

use regex::Regex;

/// 条目标记：`<entry name="NAME">TEXT</entry>`，TEXT 可以为空
fn entry_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"<entry name="([^"]+)">([^<]*)</entry>"#).expect("entry pattern is valid")
    })
}

/// 脚本中的条目列表（保持出现顺序）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryList {
    entries: Vec<(String, String)>,
}

impl EntryList {
    /// 从标记文本中提取条目
    ///
    /// 重复的名称保留首次出现的位置，取最后一次的文本。
    pub fn parse(markup: &str) -> Self {
        let mut list = EntryList::default();
        for captures in entry_pattern().captures_iter(markup) {
            let name = &captures[1];
            let text = &captures[2];
            match list.position(name) {
                Some(index) => list.entries[index].1 = text.to_string(),
                None => list.entries.push((name.to_string(), text.to_string())),
            }
        }
        list
    }

    /// 重新生成标记文本
    pub fn render(&self) -> String {
        let lines: Vec<String> = self
            .entries
            .iter()
            .map(|(name, text)| format!("<entry name=\"{}\">{}</entry>", name, text))
            .collect();
        format!("<entries>\n{}\n</entries>\n", lines.join("\n"))
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|index| self.entries[index].1.as_str())
    }

    /// 更新已存在的条目，返回文本是否发生变化
    ///
    /// 不存在的条目不会被添加。
    pub fn set(&mut self, name: &str, text: &str) -> bool {
        match self.position(name) {
            Some(index) if self.entries[index].1 != text => {
                self.entries[index].1 = text.to_string();
                true
            }
            _ => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, text)| (name.as_str(), text.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(n, _)| n == name)
    }
}

/// 检查文本能否写入条目标记
pub fn check_representable(text: &str) -> Result<(), String> {
    if text.contains('<') {
        return Err("文本包含无法写入条目标记的字符 '<'".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entries() {
        let markup = "<entries>\n<entry name=\"A\">Hello</entry>\n<entry name=\"B\"></entry>\n</entries>";
        let list = EntryList::parse(markup);

        assert_eq!(list.len(), 2);
        assert_eq!(list.get("A"), Some("Hello"));
        assert_eq!(list.get("B"), Some(""));
        assert_eq!(list.get("C"), None);
    }

    #[test]
    fn test_duplicates_keep_first_position_last_value() {
        let markup = r#"<entry name="A">1</entry><entry name="B">2</entry><entry name="A">3</entry>"#;
        let list = EntryList::parse(markup);

        let entries: Vec<_> = list.iter().collect();
        assert_eq!(entries, vec![("A", "3"), ("B", "2")]);
    }

    #[test]
    fn test_render() {
        let mut list = EntryList::parse(r#"<entry name="A">x</entry><entry name="B">y</entry>"#);
        assert!(list.set("B", "多行\n文本"));
        assert!(!list.set("B", "多行\n文本"));
        assert!(!list.set("Z", "new"));

        let rendered = list.render();
        assert_eq!(
            rendered,
            "<entries>\n<entry name=\"A\">x</entry>\n<entry name=\"B\">多行\n文本</entry>\n</entries>\n"
        );
        assert_eq!(EntryList::parse(&rendered), list);
    }

    #[test]
    fn test_check_representable() {
        assert!(check_representable("plain & simple > ok").is_ok());
        assert!(check_representable("<b>bold</b>").is_err());
    }
}
