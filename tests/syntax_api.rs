use std::io;

use proptest::prelude::*;
use sh_syntax::{
    node_type, parse, walk, Command, LangVariant, NodeRef, Parser, ParserConfig, Printer, WordPart,
};

/// Node types in walk order, with `nil` for each end-of-children marker.
fn signature(src: &str) -> Vec<&'static str> {
    let file = parse(src).unwrap();
    let mut types = Vec::new();
    walk(NodeRef::File(&file), &mut |node| {
        types.push(node_type(node));
        true
    });
    types
}

fn reprint(src: &str) -> String {
    Printer::new().print(&parse(src).unwrap())
}

fn assert_round_trip(src: &str) {
    let printed = reprint(src);
    assert_eq!(signature(src), signature(&printed), "reprinted as:\n{}", printed);
    assert_eq!(printed, reprint(&printed));
}

#[test]
fn test_simple_call() {
    let file = parse("echo 'foo'").unwrap();
    assert_eq!(file.stmts.stmts.len(), 1);
    let Some(Command::CallExpr(call)) = &file.stmts.stmts[0].cmd else {
        panic!("expected a call");
    };
    assert_eq!(call.args.len(), 2);
    assert_eq!(call.args[0].parts.len(), 1);
    assert!(matches!(&call.args[0].parts[0], WordPart::Lit(l) if l.value == "echo"));
}

#[test]
fn test_unclosed_param_exp_position() {
    let err = parse("echo ${").unwrap_err();
    assert_eq!((err.pos.line(), err.pos.col()), (1, 6));
    assert!(err.to_string().starts_with("1:6: "));
}

#[test]
fn test_binary_cmd_positions() {
    let file = parse("foo || bar").unwrap();
    let stmt = &file.stmts.stmts[0];
    let Some(Command::BinaryCmd(bin)) = &stmt.cmd else {
        panic!("expected a binary command");
    };
    assert_eq!(stmt.pos().offset(), 0);
    assert_eq!(stmt.pos().to_string(), "1:1");
    assert_eq!(bin.op_pos.offset(), 4);
    assert_eq!(bin.op_pos.to_string(), "1:5");
}

#[test]
fn test_walk_counts() {
    let file = parse("foo bar").unwrap();
    let (mut nodes, mut markers) = (0, 0);
    let (mut saw_bar, mut saw_call) = (false, false);
    walk(NodeRef::File(&file), &mut |node| {
        match node {
            Some(n) => {
                nodes += 1;
                saw_bar |= matches!(n, NodeRef::Lit(l) if l.value == "bar");
                saw_call |= matches!(n, NodeRef::CallExpr(_));
            }
            None => markers += 1,
        }
        true
    });
    assert_eq!((nodes, markers), (7, 7));
    assert!(saw_bar && saw_call);
    assert_eq!(
        signature("foo bar"),
        vec![
            "File", "Stmt", "CallExpr", "Word", "Lit", "nil", "nil", "Word", "Lit", "nil", "nil",
            "nil", "nil", "nil"
        ]
    );
}

#[test]
fn test_print_normalizes_blanks() {
    assert_eq!(reprint("echo      'foo'"), "echo 'foo'\n");
}

#[test]
fn test_print_mksh_with_stop_sequence() {
    let parser = Parser::new(
        ParserConfig::new()
            .keep_comments(true)
            .variant(LangVariant::MirBSDKorn)
            .stop_at("$$"),
    );
    let file = parser.parse("echo ${|stmts;} # bar\n$$", "").unwrap();
    assert_eq!(Printer::new().print(&file), "echo ${|stmts;} # bar\n");
}

#[test]
fn test_interactive_sequence() {
    let parser = Parser::default();
    let mut chunks = ["foo\n", "bar; baz\n", "\n", "'incom\n", "plete'\n"]
        .into_iter()
        .map(String::from);
    let mut src = move || -> io::Result<Option<String>> { Ok(chunks.next()) };
    let mut seen = Vec::new();
    parser
        .interactive(&mut src, |stmts| {
            seen.push((stmts.len(), parser.incomplete()));
            true
        })
        .unwrap();
    assert_eq!(seen, vec![(1, false), (2, false), (0, false), (0, true), (1, false)]);
}

#[test]
fn test_child_collections_clone_identity() {
    let file = parse("a; b").unwrap();
    let first = file.stmts.stmts.clone();
    let second = file.stmts.stmts.clone();
    assert_eq!(first, second);
    assert!(!std::ptr::eq(first.as_ptr(), second.as_ptr()));
    let held = &file.stmts.stmts;
    assert!(std::ptr::eq(&held[0], &held[0]));
    assert_eq!(held[1], held[1]);
}

#[test]
fn test_round_trip_corpus() {
    let corpus = [
        "echo foo; bar=baz qux >out 2>&1 &",
        "if a; then b; elif c; then d; else e; fi",
        "while read -r line; do echo \"$line\"; done <file",
        "until false; do :; done",
        "for i in 1 2 \"3 4\"; do echo $i; done",
        "for ((i = 0; i < 10; i++)); do echo $i; done",
        "case $x in a|b) echo ab;; *) echo other;& esac",
        "f() { local x=${1:-def}; echo ${#x} ${x/a/b} ${x:1:2}; }",
        "function g { (cd /tmp && ls) | wc -l; }",
        "arr=(a [2]=b 'c d') x+=1 y[i+1]=z",
        "[[ -f $f && $a =~ ^[0-9]+$ || ! -z $b ]]",
        "(( x = y ? 1 : 2, z ** 2 ))",
        "echo $(( (1 + 2) * -3 )) $(a; b) `c` <(d) >(e)",
        "cat <<EOF | grep x\nline $HOME\nEOF\necho done",
        "cat <<-'EOF'\n\tliteral $x\n\tEOF",
        "time -p sleep 1",
        "! a | b",
        "echo @(a|b) $'esc\\n' \"nested $(echo \"inner\")\"",
        "x=$(cat <<EOF\nbody\nEOF\n)",
        "while read l; do echo $l; done < <(ls)",
        "cat > >(tee log) 2>&1",
        "echo `cat <<EOF\nx\nEOF\n`",
        ">out }",
        "2>err [[ x ]]",
        "echo a\\",
    ];
    for src in corpus {
        assert_round_trip(src);
    }
}

#[test]
fn test_round_trip_keeps_comments() {
    let parser = Parser::new(ParserConfig::new().keep_comments(true));
    let sources = [
        "# header\nfoo # trailing\nif a; then\n\t# inside\n\tb\nfi\n# end\n",
        "echo `a # c\nb\n`\n",
        "x=$(\n\t# lead\n\ta\n)\n",
    ];
    for src in sources {
        let file = parser.parse(src, "").unwrap();
        assert_eq!(Printer::new().print(&file), src);
    }
}

#[test]
fn test_mksh_substitutions_round_trip() {
    let parser = Parser::new(ParserConfig::new().variant(LangVariant::MirBSDKorn));
    let cases = [
        ("echo ${ a; b;} ${|c;}", "echo ${ a; b;} ${|c;}\n"),
        ("echo ${ cat <<EOF\nx\nEOF\n}", "echo ${\n\tcat <<EOF\nx\nEOF\n}\n"),
    ];
    for (src, want) in cases {
        let printed = Printer::new().print(&parser.parse(src, "").unwrap());
        assert_eq!(printed, want);
        let again = Printer::new().print(&parser.parse(&printed, "").unwrap());
        assert_eq!(again, printed);
    }
}

#[test]
fn test_trailing_backslash_is_dropped() {
    assert_eq!(reprint("\\"), "");
    assert_eq!(reprint("echo a\\"), "echo a\n");
    assert_eq!(
        parse(">\\").unwrap_err().message,
        "> must be followed by a word"
    );
}

fn word() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "echo", "a", "'q s'", "\"$x\"", "${y:-z}", "$(b c)", "$((1 + 2))", "x=1", "\"a${b}c\"",
        "$@", "`a`", ">f", "2>&1", "< <(a)", "<(b)",
    ])
}

fn separator() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["; ", " && ", " || ", " | ", "\n", " & "])
}

proptest! {
    #[test]
    fn test_generated_scripts_round_trip(
        first in prop::collection::vec(word(), 1..4),
        rest in prop::collection::vec((separator(), prop::collection::vec(word(), 1..4)), 0..5),
    ) {
        let mut src = first.join(" ");
        for (sep, words) in &rest {
            src.push_str(sep);
            src.push_str(&words.join(" "));
        }
        let printed = reprint(&src);
        prop_assert_eq!(signature(&src), signature(&printed));
        prop_assert_eq!(reprint(&printed), printed);
    }
}
