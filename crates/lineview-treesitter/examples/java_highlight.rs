use lineview_core::StyleSpanComputer;
use lineview_treesitter::{AstHighlighter, CursorHighlighter, TreeSitterHighlightConfig};

fn main() {
    let text = r#"
import java.util.List;

// comment
class Adder {
    int add(int a, int b) {
        String s = "hi";
        return a + b;
    }
}
"#;

    let mut ast = AstHighlighter::new(TreeSitterHighlightConfig::java()).expect("init ast");
    let mut cursor =
        CursorHighlighter::new(TreeSitterHighlightConfig::java()).expect("init tree-cursor");

    let chars: Vec<char> = text.chars().collect();
    for highlighter in [
        &mut ast as &mut dyn StyleSpanComputer,
        &mut cursor as &mut dyn StyleSpanComputer,
    ] {
        let spans = highlighter.compute(text).expect("highlight");
        println!("== {} ({} spans)", highlighter.name(), spans.len());
        for span in spans.iter().filter(|s| !s.tag.is_plain()) {
            let token: String = chars[span.range()].iter().collect();
            println!("{:>5}..{:<5} {:<12} {token:?}", span.start, span.end, span.tag.as_str());
        }
    }
}
