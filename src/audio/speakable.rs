// Longest symbols first so "==" wins over "=".
const SYMBOL_NAMES: &[(&str, &str)] = &[
    ("===", "triple equals"),
    ("```", "triple backtick"),
    ("<=", "less than or equal to"),
    (">=", "greater than or equal to"),
    ("<>", "not equal to"),
    ("!=", "not equal to"),
    ("<<", "left shift"),
    (">>", "right shift"),
    ("__", "dunder"),
    ("==", "double equals"),
    ("++", "plus plus"),
    ("--", "minus minus"),
    ("+=", "plus equals"),
    ("-=", "minus equals"),
    ("->", "arrow"),
    ("=>", "fat arrow"),
    ("::", "path"),
    ("[", "open bracket"),
    ("]", "close bracket"),
    ("(", "open paren"),
    (")", "close paren"),
    ("{", "open curly brace"),
    ("}", "close curly brace"),
    ("<", "open angle bracket"),
    (">", "close angle bracket"),
    (".", "dot"),
    ("&", "ref"),
    ("!", "bang"),
    ("#", "hash"),
    ("$", "dollar sign"),
    ("%", "percent"),
    ("^", "caret"),
    ("*", "asterisk"),
    ("+", "plus"),
    ("-", "minus"),
    ("=", "equals"),
    ("\\", "backslash"),
    ("|", "pipe"),
    ("/", "slash"),
    ("`", "backtick"),
    ("'", "single quote"),
    (",", "comma"),
    (";", "semicolon"),
    (":", "colon"),
    ("\"", "double quote"),
    ("?", "question mark"),
    ("_", "underscore"),
    ("~", "tilde"),
    ("@", "at sign"),
    ("€", "euro"),
    ("£", "pound"),
    ("¥", "yen"),
];

/// Spoken name of a single character, e.g. `(` is "open paren".
pub fn char_name(ch: char) -> String {
    match ch {
        ' ' => "space".to_string(),
        '\t' => "tab".to_string(),
        '\n' => "new line".to_string(),
        _ => {
            let mut buf = [0u8; 4];
            let symbol: &str = ch.encode_utf8(&mut buf);
            SYMBOL_NAMES
                .iter()
                .find(|(s, _)| *s == symbol)
                .map_or_else(|| ch.to_string(), |(_, name)| name.to_string())
        }
    }
}

/// Rewrite `text` so a speech synthesizer reads symbols by name.
pub fn speakable(text: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut plain = String::new();
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        if let Some((symbol, name)) = SYMBOL_NAMES.iter().find(|(s, _)| rest.starts_with(*s)) {
            if !plain.trim().is_empty() {
                words.push(plain.trim().to_string());
            }
            plain.clear();
            words.push(name.to_string());
            rest = &rest[symbol.len()..];
        } else {
            plain.push(c);
            rest = &rest[c.len_utf8()..];
        }
    }
    if !plain.trim().is_empty() {
        words.push(plain.trim().to_string());
    }

    if words.is_empty() && !text.is_empty() {
        return "blank".to_string();
    }
    words.join(" ")
}

/// Letters separated by pauses, for spelling a word aloud.
pub fn spelled(word: &str) -> String {
    word.chars().map(char_name).collect::<Vec<_>>().join(", ")
}
