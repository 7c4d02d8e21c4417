/// 工具函数集合

/// 去掉名字末尾的 `AI`（区分大小写），用于 chatroom 命令
pub fn strip_ai_suffix(name: &str) -> &str {
    name.strip_suffix("AI").unwrap_or(name)
}

/// 去掉名字末尾的 `AI`（忽略大小写），用于 chip 标签
pub fn chip_label(name: &str) -> &str {
    let len = name.len();
    if len >= 2 && name.is_char_boundary(len - 2) && name[len - 2..].eq_ignore_ascii_case("ai") {
        &name[..len - 2]
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_ai_suffix() {
        assert_eq!(strip_ai_suffix("CoderAI"), "Coder");
        assert_eq!(strip_ai_suffix("PoetAI"), "Poet");
        assert_eq!(strip_ai_suffix("Coderai"), "Coderai");
        assert_eq!(strip_ai_suffix("AI"), "");
        assert_eq!(strip_ai_suffix("Base"), "Base");
    }

    #[test]
    fn test_chip_label() {
        assert_eq!(chip_label("CoderAI"), "Coder");
        assert_eq!(chip_label("Coderai"), "Coder");
        assert_eq!(chip_label("Coder"), "Coder");
        assert_eq!(chip_label("a"), "a");
        assert_eq!(chip_label("诗人ai"), "诗人");
    }
}
