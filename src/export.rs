use once_cell::sync::Lazy;
use regex::Regex;

pub const XML_PROLOG: &str = r#"<?xml version="1.0" standalone="no"?>"#;

static EMPTY_NS_DECL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#" xmlns:NS\d+="""#).unwrap());
static NS_PREFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r" NS\d+:(\w+)").unwrap());

/// Prepends the XML prolog to serialized SVG markup.
pub fn svg_document(svg: &str) -> String {
    format!("{XML_PROLOG}\r\n{svg}")
}

/// Strips the empty `NSn` namespace declarations some serializers emit and
/// drops the matching attribute prefixes.
pub fn patch_legacy_namespaces(svg: &str) -> String {
    let without_decls = EMPTY_NS_DECL_RE.replace_all(svg, "");
    NS_PREFIX_RE.replace_all(&without_decls, " $1").into_owned()
}

/// File name offered when the SVG is downloaded.
pub fn export_file_name(timestamp_millis: u128) -> String {
    format!("tree-{timestamp_millis}.svg")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_starts_with_prolog() {
        let doc = svg_document("<svg/>");
        assert!(doc.starts_with("<?xml version=\"1.0\" standalone=\"no\"?>"));
        assert!(doc.ends_with("<svg/>"));
    }

    #[test]
    fn legacy_namespaces_are_removed() {
        let svg = r##"<svg xmlns:NS1="" NS1:href="#a"><use xmlns:NS12="" NS12:href="#b"/></svg>"##;
        assert_eq!(
            patch_legacy_namespaces(svg),
            r##"<svg href="#a"><use href="#b"/></svg>"##
        );
    }

    #[test]
    fn clean_markup_is_untouched() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"><g id="NS"/></svg>"#;
        assert_eq!(patch_legacy_namespaces(svg), svg);
    }

    #[test]
    fn file_name_carries_the_timestamp() {
        assert_eq!(export_file_name(1_700_000_000_000), "tree-1700000000000.svg");
    }
}
