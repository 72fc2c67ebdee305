//! Printer
//!
//! Turns a syntax tree back into shell source. The output depends only on
//! the kinds and values of the nodes, not on their positions: statements go
//! one per line, nested bodies are indented with one tab per level, and
//! command substitutions are joined with `; ` on a single line unless they
//! hold comments or here-documents.

use crate::ast::types::*;
use crate::ast::walk::{walk, NodeRef};
use crate::parser::command_parser::heredoc_delimiter;
use crate::parser::lexer::RESERVED_WORDS;

/// Pretty-printer for syntax trees.
#[derive(Debug, Default)]
pub struct Printer {
    out: String,
    level: usize,
    inline: bool,
    /// Bodies and closing delimiters to write after the current line
    heredocs: Vec<(String, String)>,
}

impl Printer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Print a whole file. Non-empty output ends in exactly one newline.
    pub fn print(&mut self, file: &File) -> String {
        self.reset();
        self.stmt_lines(&file.stmts);
        self.finish()
    }

    /// Print a single statement together with its comments and
    /// here-document bodies.
    pub fn print_stmt(&mut self, stmt: &Stmt) -> String {
        self.reset();
        self.stmt_line(stmt);
        self.finish()
    }

    pub fn print_word(&mut self, word: &Word) -> String {
        self.reset();
        self.word(word);
        std::mem::take(&mut self.out)
    }

    fn reset(&mut self) {
        self.out.clear();
        self.level = 0;
        self.inline = false;
        self.heredocs.clear();
    }

    fn finish(&mut self) -> String {
        if !self.heredocs.is_empty() {
            self.newline();
        }
        let mut out = std::mem::take(&mut self.out);
        let trimmed = out.trim_end_matches('\n').len();
        out.truncate(trimmed);
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }

    // -------------------------------------------------------------------------
    // Layout
    // -------------------------------------------------------------------------

    fn indent(&mut self) {
        for _ in 0..self.level {
            self.out.push('\t');
        }
    }

    /// End the current line, then write any here-documents it started.
    fn newline(&mut self) {
        self.out.push('\n');
        for (body, delimiter) in std::mem::take(&mut self.heredocs) {
            self.out.push_str(&body);
            self.out.push_str(&delimiter);
            self.out.push('\n');
        }
    }

    fn comment_line(&mut self, comment: &Comment) {
        self.indent();
        self.out.push('#');
        self.out.push_str(&comment.text);
        self.newline();
    }

    fn stmt_lines(&mut self, list: &StmtList) {
        for stmt in &list.stmts {
            self.stmt_line(stmt);
        }
        for comment in &list.last {
            self.comment_line(comment);
        }
    }

    fn stmt_line(&mut self, stmt: &Stmt) {
        for comment in &stmt.comments {
            self.comment_line(comment);
        }
        self.indent();
        self.stmt(stmt);
        if let Some(comment) = &stmt.trailing {
            self.out.push_str(" #");
            self.out.push_str(&comment.text);
        }
        self.newline();
    }

    /// Statements joined on one line.
    fn inline_list(&mut self, list: &StmtList) {
        for (i, stmt) in list.stmts.iter().enumerate() {
            if i > 0 {
                self.out.push_str(separator(&list.stmts[i - 1]));
            }
            self.stmt(stmt);
        }
    }

    /// The body of a compound command, up to where its closing keyword goes.
    fn body(&mut self, list: &StmtList) {
        if self.inline {
            self.out.push(' ');
            if !list.stmts.is_empty() {
                self.inline_list(list);
                self.out.push_str(terminator(list));
            }
        } else {
            self.newline();
            self.level += 1;
            self.stmt_lines(list);
            self.level -= 1;
            self.indent();
        }
    }

    /// A condition list, always kept on the line of its keyword.
    fn cond(&mut self, list: &StmtList) {
        let inline = std::mem::replace(&mut self.inline, true);
        self.inline_list(list);
        self.inline = inline;
        self.out.push_str(terminator(list));
    }

    /// Statements inside a substitution, up to the closing token.
    fn nested(&mut self, list: &StmtList) {
        if needs_lines(list) {
            let inline = std::mem::replace(&mut self.inline, false);
            self.newline();
            self.level += 1;
            self.stmt_lines(list);
            self.level -= 1;
            self.indent();
            self.inline = inline;
        } else {
            let inline = std::mem::replace(&mut self.inline, true);
            self.inline_list(list);
            self.inline = inline;
        }
    }

    // -------------------------------------------------------------------------
    // Statements and commands
    // -------------------------------------------------------------------------

    fn stmt(&mut self, stmt: &Stmt) {
        if stmt.negated {
            self.out.push_str("! ");
        }
        if redirs_first(stmt) {
            for redir in &stmt.redirs {
                self.redirect(redir);
                self.out.push(' ');
            }
            if let Some(cmd) = &stmt.cmd {
                self.command(cmd);
            }
        } else {
            if let Some(cmd) = &stmt.cmd {
                self.command(cmd);
            }
            for (i, redir) in stmt.redirs.iter().enumerate() {
                if stmt.cmd.is_some() || i > 0 {
                    self.out.push(' ');
                }
                self.redirect(redir);
            }
        }
        if stmt.background {
            self.out.push_str(" &");
        }
    }

    fn command(&mut self, cmd: &Command) {
        match cmd {
            Command::CallExpr(call) => {
                for (i, assign) in call.assigns.iter().enumerate() {
                    if i > 0 {
                        self.out.push(' ');
                    }
                    self.assign(assign);
                }
                for (i, arg) in call.args.iter().enumerate() {
                    if i > 0 || !call.assigns.is_empty() {
                        self.out.push(' ');
                    }
                    self.word(arg);
                }
            }
            Command::IfClause(clause) => {
                self.out.push_str("if ");
                self.cond(&clause.cond);
                self.out.push_str("then");
                self.body(&clause.then);
                for elif in &clause.elifs {
                    self.out.push_str("elif ");
                    self.cond(&elif.cond);
                    self.out.push_str("then");
                    self.body(&elif.then);
                }
                if let Some(stmts) = &clause.else_stmts {
                    self.out.push_str("else");
                    self.body(stmts);
                }
                self.out.push_str("fi");
            }
            Command::WhileClause(clause) => {
                self.out.push_str(if clause.until { "until " } else { "while " });
                self.cond(&clause.cond);
                self.out.push_str("do");
                self.body(&clause.body);
                self.out.push_str("done");
            }
            Command::ForClause(clause) => {
                self.out.push_str(if clause.select { "select " } else { "for " });
                match &clause.looper {
                    Loop::WordIter(iter) => {
                        self.out.push_str(&iter.name.value);
                        if iter.in_pos.is_some() {
                            self.out.push_str(" in");
                            for item in &iter.items {
                                self.out.push(' ');
                                self.word(item);
                            }
                        }
                    }
                    Loop::CStyleLoop(cloop) => {
                        self.out.push_str("((");
                        self.opt_arithm(cloop.init.as_ref(), "");
                        self.out.push(';');
                        self.opt_arithm(cloop.cond.as_ref(), " ");
                        self.out.push(';');
                        self.opt_arithm(cloop.post.as_ref(), " ");
                        self.out.push_str("))");
                    }
                }
                self.out.push_str("; do");
                self.body(&clause.body);
                self.out.push_str("done");
            }
            Command::CaseClause(clause) => self.case_clause(clause),
            Command::Block(block) => {
                self.out.push('{');
                self.body(&block.stmts);
                self.out.push('}');
            }
            Command::Subshell(sub) => {
                self.out.push('(');
                if self.inline || !needs_lines(&sub.stmts) {
                    let inline = std::mem::replace(&mut self.inline, true);
                    if starts_with_subshell(&sub.stmts) {
                        self.out.push(' ');
                    }
                    self.inline_list(&sub.stmts);
                    self.inline = inline;
                } else {
                    self.nested(&sub.stmts);
                }
                self.out.push(')');
            }
            Command::BinaryCmd(bin) => {
                self.stmt(&bin.x);
                self.out.push(' ');
                self.out.push_str(bin.op.as_str());
                if !self.inline && !bin.y.comments.is_empty() {
                    self.newline();
                    self.level += 1;
                    for comment in &bin.y.comments {
                        self.comment_line(comment);
                    }
                    self.indent();
                    self.level -= 1;
                } else {
                    self.out.push(' ');
                }
                self.stmt(&bin.y);
            }
            Command::FuncDecl(func) => {
                if func.rsrv_word {
                    self.out.push_str("function ");
                    self.out.push_str(&func.name.value);
                    self.out.push(' ');
                } else {
                    self.out.push_str(&func.name.value);
                    self.out.push_str("() ");
                }
                self.stmt(&func.body);
            }
            Command::ArithmCmd(cmd) => {
                self.out.push_str("((");
                self.arithm(&cmd.x, false);
                self.out.push_str("))");
            }
            Command::TestClause(clause) => {
                self.out.push_str("[[ ");
                self.test(&clause.x);
                self.out.push_str(" ]]");
            }
            Command::TimeClause(clause) => {
                self.out.push_str("time");
                if clause.posix_format {
                    self.out.push_str(" -p");
                }
                if let Some(stmt) = &clause.stmt {
                    self.out.push(' ');
                    self.stmt(stmt);
                }
            }
        }
    }

    fn case_clause(&mut self, clause: &CaseClause) {
        self.out.push_str("case ");
        self.word(&clause.word);
        self.out.push_str(" in");
        if self.inline {
            for item in &clause.items {
                self.out.push(' ');
                self.case_patterns(item);
                self.out.push(' ');
                if !item.stmts.stmts.is_empty() {
                    self.inline_list(&item.stmts);
                    self.out.push(' ');
                }
                self.out.push_str(item.op.as_str());
            }
            self.out.push_str(" esac");
            return;
        }
        self.newline();
        for item in &clause.items {
            for comment in &item.comments {
                self.comment_line(comment);
            }
            self.indent();
            self.case_patterns(item);
            self.newline();
            self.level += 1;
            self.stmt_lines(&item.stmts);
            self.indent();
            self.out.push_str(item.op.as_str());
            self.newline();
            self.level -= 1;
        }
        for comment in &clause.last {
            self.comment_line(comment);
        }
        self.indent();
        self.out.push_str("esac");
    }

    fn case_patterns(&mut self, item: &CaseItem) {
        for (i, pattern) in item.patterns.iter().enumerate() {
            if i > 0 {
                self.out.push_str(" | ");
            }
            self.word(pattern);
        }
        self.out.push(')');
    }

    fn assign(&mut self, assign: &Assign) {
        self.out.push_str(&assign.name.value);
        if let Some(index) = &assign.index {
            self.index(index);
        }
        self.out.push_str(if assign.append { "+=" } else { "=" });
        if let Some(array) = &assign.array {
            self.out.push('(');
            for (i, elem) in array.elems.iter().enumerate() {
                if i > 0 {
                    self.out.push(' ');
                }
                if let Some(index) = &elem.index {
                    self.index(index);
                    self.out.push('=');
                }
                self.word(&elem.value);
            }
            self.out.push(')');
        } else if let Some(value) = &assign.value {
            self.word(value);
        }
    }

    /// An assignment index, printed without blanks so the word stays whole.
    fn index(&mut self, index: &ArithmExpr) {
        self.out.push('[');
        self.arithm(index, true);
        self.out.push(']');
    }

    fn redirect(&mut self, redir: &Redirect) {
        if let Some(n) = &redir.n {
            self.out.push_str(&n.value);
        }
        self.out.push_str(redir.op.as_str());
        if matches!(redir.word.parts.first(), Some(WordPart::ProcSubst(_))) {
            self.out.push(' ');
        }
        self.word(&redir.word);
        if let Some(hdoc) = &redir.hdoc {
            let mut body = Printer::new();
            body.word(hdoc);
            let (delimiter, _) = heredoc_delimiter(&redir.word);
            self.heredocs.push((body.out, delimiter));
        }
    }

    // -------------------------------------------------------------------------
    // Words
    // -------------------------------------------------------------------------

    fn word(&mut self, word: &Word) {
        for part in &word.parts {
            self.word_part(part);
        }
    }

    fn word_part(&mut self, part: &WordPart) {
        match part {
            WordPart::Lit(lit) => self.out.push_str(&lit.value),
            WordPart::SglQuoted(q) => {
                if q.dollar {
                    self.out.push('$');
                }
                self.out.push('\'');
                self.out.push_str(&q.value);
                self.out.push('\'');
            }
            WordPart::DblQuoted(q) => {
                if q.dollar {
                    self.out.push('$');
                }
                self.out.push('"');
                for part in &q.parts {
                    self.word_part(part);
                }
                self.out.push('"');
            }
            WordPart::ParamExp(pe) => self.param_exp(pe),
            WordPart::CmdSubst(cs) => self.cmd_subst(cs),
            WordPart::ArithmExp(ae) => {
                self.out.push_str(if ae.bracket { "$[" } else { "$((" });
                self.arithm(&ae.x, false);
                self.out.push_str(if ae.bracket { "]" } else { "))" });
            }
            WordPart::ProcSubst(ps) => {
                self.out.push_str(ps.op.as_str());
                self.nested(&ps.stmts);
                self.out.push(')');
            }
            WordPart::ExtGlob(eg) => {
                self.out.push_str(eg.op.as_str());
                self.out.push_str(&eg.pattern.value);
                self.out.push(')');
            }
        }
    }

    fn cmd_subst(&mut self, cs: &CmdSubst) {
        if cs.backquotes {
            let mut inner = Printer::new();
            if needs_lines(&cs.stmts) {
                inner.stmt_lines(&cs.stmts);
            } else {
                inner.inline = true;
                inner.inline_list(&cs.stmts);
            }
            self.out.push('`');
            for c in inner.out.chars() {
                if c == '\\' || c == '`' {
                    self.out.push('\\');
                }
                self.out.push(c);
            }
            self.out.push('`');
            return;
        }
        if cs.reply_var || cs.temp_file {
            self.out.push_str(if cs.reply_var { "${|" } else { "${" });
            if needs_lines(&cs.stmts) {
                self.nested(&cs.stmts);
            } else {
                if cs.temp_file {
                    self.out.push(' ');
                }
                self.nested(&cs.stmts);
                self.out.push_str(terminator(&cs.stmts).trim_end());
            }
            self.out.push('}');
            return;
        }
        self.out.push_str("$(");
        let spaced = !needs_lines(&cs.stmts) && starts_with_subshell(&cs.stmts);
        if spaced {
            self.out.push(' ');
        }
        self.nested(&cs.stmts);
        if spaced {
            self.out.push(' ');
        }
        self.out.push(')');
    }

    fn param_exp(&mut self, pe: &ParamExp) {
        if pe.short {
            self.out.push('$');
            self.out.push_str(&pe.param.value);
            return;
        }
        self.out.push_str("${");
        if pe.length {
            self.out.push('#');
        }
        if pe.width {
            self.out.push('%');
        }
        if pe.excl {
            self.out.push('!');
        }
        self.out.push_str(&pe.param.value);
        if let Some(index) = &pe.index {
            self.out.push('[');
            self.arithm(index, false);
            self.out.push(']');
        }
        if let Some(names) = pe.names {
            self.out.push_str(names.as_str());
        }
        if let Some(slice) = &pe.slice {
            self.out.push(':');
            let offset = arithm_string(&slice.offset);
            if offset.starts_with('-') {
                self.out.push(' ');
            }
            self.out.push_str(&offset);
            if let Some(length) = &slice.length {
                self.out.push(':');
                self.arithm(length, false);
            }
        } else if let Some(repl) = &pe.repl {
            self.out.push_str(if repl.all { "//" } else { "/" });
            self.word(&repl.orig);
            if let Some(with) = &repl.with {
                self.out.push('/');
                self.word(with);
            }
        } else if let Some(exp) = &pe.exp {
            self.out.push_str(exp.op.as_str());
            if let Some(word) = &exp.word {
                self.word(word);
            }
        }
        self.out.push('}');
    }

    // -------------------------------------------------------------------------
    // Arithmetic and tests
    // -------------------------------------------------------------------------

    fn opt_arithm(&mut self, expr: Option<&ArithmExpr>, lead: &str) {
        if let Some(expr) = expr {
            self.out.push_str(lead);
            self.arithm(expr, false);
        }
    }

    fn arithm(&mut self, expr: &ArithmExpr, compact: bool) {
        match expr {
            ArithmExpr::Word(word) => self.word(word),
            ArithmExpr::ParenArithm(paren) => {
                self.out.push('(');
                self.arithm(&paren.x, compact);
                self.out.push(')');
            }
            ArithmExpr::UnaryArithm(un) => {
                if un.post {
                    self.arithm(&un.x, compact);
                    self.out.push_str(un.op.as_str());
                    return;
                }
                self.out.push_str(un.op.as_str());
                let operand = {
                    let mut p = Printer::new();
                    p.arithm(&un.x, compact);
                    p.out
                };
                let op_char = un.op.as_str().chars().last();
                if op_char.is_some() && operand.starts_with(|c| Some(c) == op_char) {
                    self.out.push(' ');
                }
                self.out.push_str(&operand);
            }
            ArithmExpr::BinaryArithm(bin) => {
                self.arithm(&bin.x, compact);
                match (bin.op, compact) {
                    (BinAritOperator::Comma, false) => self.out.push_str(", "),
                    (op, false) => {
                        self.out.push(' ');
                        self.out.push_str(op.as_str());
                        self.out.push(' ');
                    }
                    (op, true) => self.out.push_str(op.as_str()),
                }
                self.arithm(&bin.y, compact);
            }
        }
    }

    fn test(&mut self, expr: &TestExpr) {
        match expr {
            TestExpr::Word(word) => self.word(word),
            TestExpr::ParenTest(paren) => {
                self.out.push_str("( ");
                self.test(&paren.x);
                self.out.push_str(" )");
            }
            TestExpr::UnaryTest(un) => {
                self.out.push_str(un.op.as_str());
                self.out.push(' ');
                self.test(&un.x);
            }
            TestExpr::BinaryTest(bin) => {
                self.test(&bin.x);
                self.out.push(' ');
                self.out.push_str(bin.op.as_str());
                self.out.push(' ');
                self.test(&bin.y);
            }
        }
    }
}

/// Print a single word part, as it would appear in source.
pub fn print_word_part(part: &WordPart) -> String {
    let mut printer = Printer::new();
    printer.word_part(part);
    printer.out
}

fn arithm_string(expr: &ArithmExpr) -> String {
    let mut printer = Printer::new();
    printer.arithm(expr, false);
    printer.out
}

/// What goes between a statement and the next one on the same line.
fn separator(stmt: &Stmt) -> &'static str {
    if stmt.background {
        " "
    } else {
        "; "
    }
}

/// What ends the last statement of a list before a closing keyword.
fn terminator(list: &StmtList) -> &'static str {
    match list.stmts.last() {
        Some(stmt) => separator(stmt),
        None => " ",
    }
}

/// Whether redirections must come before the words, because the command
/// name would otherwise be read as a reserved word.
fn redirs_first(stmt: &Stmt) -> bool {
    let Some(Command::CallExpr(call)) = &stmt.cmd else {
        return false;
    };
    if stmt.redirs.is_empty() || !call.assigns.is_empty() {
        return false;
    }
    call.args
        .first()
        .and_then(|w| w.lit())
        .is_some_and(|name| RESERVED_WORDS.contains(name))
}

/// `$( (a) )` must not run together into `$((a))`.
fn starts_with_subshell(list: &StmtList) -> bool {
    fn first(stmt: &Stmt) -> bool {
        if stmt.negated {
            return false;
        }
        match &stmt.cmd {
            Some(Command::Subshell(_)) => true,
            Some(Command::BinaryCmd(bin)) => first(&bin.x),
            _ => false,
        }
    }
    list.stmts.first().map(first).unwrap_or(false)
}

/// Whether statements must go on separate lines: comments and
/// here-documents cannot share a line with what follows them.
fn needs_lines(list: &StmtList) -> bool {
    if !list.last.is_empty() {
        return true;
    }
    list.stmts.iter().any(|stmt| {
        let mut found = false;
        walk(NodeRef::Stmt(stmt), &mut |node| {
            match node {
                Some(NodeRef::Comment(_)) => found = true,
                Some(NodeRef::Redirect(r)) if r.hdoc.is_some() => found = true,
                _ => {}
            }
            !found
        });
        found
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{LangVariant, Parser, ParserConfig};

    fn reprint(src: &str) -> String {
        let file = Parser::default().parse(src, "").unwrap();
        Printer::new().print(&file)
    }

    #[test]
    fn test_simple_command() {
        assert_eq!(reprint("echo      'foo'"), "echo 'foo'\n");
    }

    #[test]
    fn test_empty_file() {
        assert_eq!(reprint(""), "");
        assert_eq!(reprint("\n\n"), "");
    }

    #[test]
    fn test_one_stmt_per_line() {
        assert_eq!(reprint("a; b & c && d || e | f"), "a\nb &\nc && d || e | f\n");
    }

    #[test]
    fn test_compound_indentation() {
        assert_eq!(
            reprint("if a; then b; elif c; then d; else e; fi"),
            "if a; then\n\tb\nelif c; then\n\td\nelse\n\te\nfi\n"
        );
        assert_eq!(
            reprint("while x; do for i in 1 2; do y; done; done"),
            "while x; do\n\tfor i in 1 2; do\n\t\ty\n\tdone\ndone\n"
        );
        assert_eq!(reprint("{ a; b; }"), "{\n\ta\n\tb\n}\n");
        assert_eq!(reprint("foo() { bar; }"), "foo() {\n\tbar\n}\n");
    }

    #[test]
    fn test_case_clause() {
        assert_eq!(
            reprint("case $x in a|b) foo;; *) bar;& esac"),
            "case $x in\na | b)\n\tfoo\n\t;;\n*)\n\tbar\n\t;&\nesac\n"
        );
    }

    #[test]
    fn test_substitutions_inline() {
        assert_eq!(reprint("x=$(a; if b; then c; fi)"), "x=$(a; if b; then c; fi)\n");
        assert_eq!(reprint("echo $( (a) )"), "echo $( (a) )\n");
        assert_eq!(reprint("echo `a \\`b\\``"), "echo `a \\`b\\``\n");
    }

    #[test]
    fn test_substitution_with_comment_uses_lines() {
        let parser = Parser::new(ParserConfig::new().keep_comments(true));
        let file = parser.parse("x=$(a # note\nb)", "").unwrap();
        assert_eq!(Printer::new().print(&file), "x=$(\n\ta # note\n\tb\n)\n");
    }

    #[test]
    fn test_comments() {
        let parser = Parser::new(ParserConfig::new().keep_comments(true));
        let file = parser.parse("# lead\nfoo # trail\n# last\n", "").unwrap();
        assert_eq!(Printer::new().print(&file), "# lead\nfoo # trail\n# last\n");
    }

    #[test]
    fn test_mksh_reply_subst_with_stop() {
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
    fn test_heredoc_after_line() {
        assert_eq!(
            reprint("cat <<EOF && echo x\nhello $name\nEOF\n"),
            "cat <<EOF && echo x\nhello $name\nEOF\n"
        );
        assert_eq!(reprint("cat <<'E O'\n$a\nE O\n"), "cat <<'E O'\n$a\nE O\n");
    }

    #[test]
    fn test_arithmetic_spacing() {
        assert_eq!(reprint("((a+=1,b=c?d:e))"), "((a += 1, b = c ? d : e))\n");
        assert_eq!(reprint("echo $((- -x)) $((i++))"), "echo $((- -x)) $((i++))\n");
        assert_eq!(reprint("a[i+1]=x"), "a[i+1]=x\n");
        assert_eq!(reprint("for ((;;)); do x; done"), "for ((;;)); do\n\tx\ndone\n");
    }

    #[test]
    fn test_param_exp() {
        assert_eq!(
            reprint("echo ${a:-b} ${#a} ${!p*} ${a/x/y} ${a: -1:2} ${a[@]}"),
            "echo ${a:-b} ${#a} ${!p*} ${a/x/y} ${a: -1:2} ${a[@]}\n"
        );
    }

    #[test]
    fn test_tests_and_redirects() {
        assert_eq!(
            reprint("[[  -f a&&b =~ ^x  ]] 2>&1 >out"),
            "[[ -f a && b =~ ^x ]] 2>&1 >out\n"
        );
    }

    #[test]
    fn test_process_substitution_redirect_keeps_space() {
        assert_eq!(reprint("read l < <(ls)"), "read l < <(ls)\n");
        assert_eq!(reprint("cat > >(tee log)"), "cat > >(tee log)\n");
        assert_eq!(reprint("cat <in"), "cat <in\n");
    }

    #[test]
    fn test_backquotes_with_heredoc_use_lines() {
        assert_eq!(
            reprint("echo `cat <<EOF\nx\nEOF\n`"),
            "echo `cat <<EOF\nx\nEOF\n`\n"
        );
    }

    #[test]
    fn test_backquotes_keep_comments() {
        let parser = Parser::new(ParserConfig::new().keep_comments(true));
        let file = parser.parse("echo `a # c\nb`", "").unwrap();
        assert_eq!(Printer::new().print(&file), "echo `a # c\nb\n`\n");
    }

    #[test]
    fn test_mksh_temp_file_subst_with_heredoc() {
        let parser = Parser::new(ParserConfig::new().variant(LangVariant::MirBSDKorn));
        let file = parser.parse("echo ${ cat <<EOF\nx\nEOF\n}", "").unwrap();
        assert_eq!(
            Printer::new().print(&file),
            "echo ${\n\tcat <<EOF\nx\nEOF\n}\n"
        );
    }

    #[test]
    fn test_reserved_command_name_keeps_redirects_first() {
        assert_eq!(reprint(">out }"), ">out }\n");
        assert_eq!(reprint("2>err [[ x ]]"), "2>err [[ x ]]\n");
        assert_eq!(reprint(">out echo"), "echo >out\n");
    }

    #[test]
    fn test_print_word() {
        let file = Parser::default().parse("echo \"a $b\"'c'", "").unwrap();
        let Some(Command::CallExpr(call)) = &file.stmts.stmts[0].cmd else {
            panic!("expected a call");
        };
        assert_eq!(Printer::new().print_word(&call.args[1]), "\"a $b\"'c'");
    }
}
