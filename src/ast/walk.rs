//! Tree Traversal
//!
//! `walk` visits a syntax tree depth-first in source order. The visitor is
//! called with `Some(node)` when a node is entered; if it returns `true`,
//! the children are walked and the visitor is then called once with `None`,
//! marking the end of that node's children.

use super::types::*;

/// A borrowed handle to any node of the tree.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    File(&'a File),
    Comment(&'a Comment),
    Stmt(&'a Stmt),
    CallExpr(&'a CallExpr),
    IfClause(&'a IfClause),
    Elif(&'a Elif),
    WhileClause(&'a WhileClause),
    ForClause(&'a ForClause),
    WordIter(&'a WordIter),
    CStyleLoop(&'a CStyleLoop),
    CaseClause(&'a CaseClause),
    CaseItem(&'a CaseItem),
    Block(&'a Block),
    Subshell(&'a Subshell),
    BinaryCmd(&'a BinaryCmd),
    FuncDecl(&'a FuncDecl),
    ArithmCmd(&'a ArithmCmd),
    TestClause(&'a TestClause),
    TimeClause(&'a TimeClause),
    Assign(&'a Assign),
    ArrayExpr(&'a ArrayExpr),
    ArrayElem(&'a ArrayElem),
    Redirect(&'a Redirect),
    Word(&'a Word),
    Lit(&'a Lit),
    SglQuoted(&'a SglQuoted),
    DblQuoted(&'a DblQuoted),
    ParamExp(&'a ParamExp),
    CmdSubst(&'a CmdSubst),
    ArithmExp(&'a ArithmExp),
    ProcSubst(&'a ProcSubst),
    ExtGlob(&'a ExtGlob),
    BinaryArithm(&'a BinaryArithm),
    UnaryArithm(&'a UnaryArithm),
    ParenArithm(&'a ParenArithm),
    BinaryTest(&'a BinaryTest),
    UnaryTest(&'a UnaryTest),
    ParenTest(&'a ParenTest),
}

impl<'a> NodeRef<'a> {
    /// The type tag of the node, e.g. `"BinaryCmd"`.
    pub fn node_type(&self) -> &'static str {
        match self {
            Self::File(_) => "File",
            Self::Comment(_) => "Comment",
            Self::Stmt(_) => "Stmt",
            Self::CallExpr(_) => "CallExpr",
            Self::IfClause(_) => "IfClause",
            Self::Elif(_) => "Elif",
            Self::WhileClause(_) => "WhileClause",
            Self::ForClause(_) => "ForClause",
            Self::WordIter(_) => "WordIter",
            Self::CStyleLoop(_) => "CStyleLoop",
            Self::CaseClause(_) => "CaseClause",
            Self::CaseItem(_) => "CaseItem",
            Self::Block(_) => "Block",
            Self::Subshell(_) => "Subshell",
            Self::BinaryCmd(_) => "BinaryCmd",
            Self::FuncDecl(_) => "FuncDecl",
            Self::ArithmCmd(_) => "ArithmCmd",
            Self::TestClause(_) => "TestClause",
            Self::TimeClause(_) => "TimeClause",
            Self::Assign(_) => "Assign",
            Self::ArrayExpr(_) => "ArrayExpr",
            Self::ArrayElem(_) => "ArrayElem",
            Self::Redirect(_) => "Redirect",
            Self::Word(_) => "Word",
            Self::Lit(_) => "Lit",
            Self::SglQuoted(_) => "SglQuoted",
            Self::DblQuoted(_) => "DblQuoted",
            Self::ParamExp(_) => "ParamExp",
            Self::CmdSubst(_) => "CmdSubst",
            Self::ArithmExp(_) => "ArithmExp",
            Self::ProcSubst(_) => "ProcSubst",
            Self::ExtGlob(_) => "ExtGlob",
            Self::BinaryArithm(_) => "BinaryArithm",
            Self::UnaryArithm(_) => "UnaryArithm",
            Self::ParenArithm(_) => "ParenArithm",
            Self::BinaryTest(_) => "BinaryTest",
            Self::UnaryTest(_) => "UnaryTest",
            Self::ParenTest(_) => "ParenTest",
        }
    }

    /// Literal value of `Lit` and `SglQuoted` nodes.
    pub fn value(&self) -> Option<&'a str> {
        match self {
            Self::Lit(lit) => Some(&lit.value),
            Self::SglQuoted(q) => Some(&q.value),
            Self::Comment(c) => Some(&c.text),
            _ => None,
        }
    }

    pub fn pos(&self) -> Position {
        match self {
            Self::File(f) => f.stmts.stmts.first().map(Stmt::pos).unwrap_or_default(),
            Self::Comment(c) => c.pos(),
            Self::Stmt(s) => s.pos(),
            Self::CallExpr(c) => c.pos(),
            Self::IfClause(c) => c.if_pos,
            Self::Elif(c) => c.elif_pos,
            Self::WhileClause(c) => c.while_pos,
            Self::ForClause(c) => c.for_pos,
            Self::WordIter(w) => w.name.value_pos,
            Self::CStyleLoop(l) => l.lparen,
            Self::CaseClause(c) => c.case_pos,
            Self::CaseItem(c) => c.patterns.first().map(Word::pos).unwrap_or_default(),
            Self::Block(b) => b.lbrace,
            Self::Subshell(s) => s.lparen,
            Self::BinaryCmd(b) => b.x.pos(),
            Self::FuncDecl(f) => f.position,
            Self::ArithmCmd(a) => a.left,
            Self::TestClause(t) => t.left,
            Self::TimeClause(t) => t.time_pos,
            Self::Assign(a) => a.pos(),
            Self::ArrayExpr(a) => a.lparen,
            Self::ArrayElem(e) => match &e.index {
                Some(index) => index.pos(),
                None => e.value.pos(),
            },
            Self::Redirect(r) => r.pos(),
            Self::Word(w) => w.pos(),
            Self::Lit(l) => l.value_pos,
            Self::SglQuoted(q) => q.left,
            Self::DblQuoted(q) => q.left,
            Self::ParamExp(p) => p.dollar,
            Self::CmdSubst(c) => c.left,
            Self::ArithmExp(a) => a.left,
            Self::ProcSubst(p) => p.op_pos,
            Self::ExtGlob(g) => g.op_pos,
            Self::BinaryArithm(b) => b.x.pos(),
            Self::UnaryArithm(u) => {
                if u.post {
                    u.x.pos()
                } else {
                    u.op_pos
                }
            }
            Self::ParenArithm(p) => p.lparen,
            Self::BinaryTest(b) => b.x.pos(),
            Self::UnaryTest(u) => u.op_pos,
            Self::ParenTest(p) => p.lparen,
        }
    }
}

/// The type tag of a visited node, `"nil"` for the end-of-children marker.
pub fn node_type(node: Option<NodeRef<'_>>) -> &'static str {
    match node {
        Some(node) => node.node_type(),
        None => "nil",
    }
}

macro_rules! node_from {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl<'a> From<&'a $ty> for NodeRef<'a> {
                fn from(node: &'a $ty) -> Self {
                    NodeRef::$ty(node)
                }
            }
        )+
    };
}

node_from!(
    File, Comment, Stmt, CallExpr, IfClause, Elif, WhileClause, ForClause, WordIter,
    CStyleLoop, CaseClause, CaseItem, Block, Subshell, BinaryCmd, FuncDecl, ArithmCmd,
    TestClause, TimeClause, Assign, ArrayExpr, ArrayElem, Redirect, Word, Lit, SglQuoted,
    DblQuoted, ParamExp, CmdSubst, ArithmExp, ProcSubst, ExtGlob, BinaryArithm, UnaryArithm,
    ParenArithm, BinaryTest, UnaryTest, ParenTest,
);

impl<'a> From<&'a Command> for NodeRef<'a> {
    fn from(cmd: &'a Command) -> Self {
        match cmd {
            Command::CallExpr(c) => NodeRef::CallExpr(c),
            Command::IfClause(c) => NodeRef::IfClause(c),
            Command::WhileClause(c) => NodeRef::WhileClause(c),
            Command::ForClause(c) => NodeRef::ForClause(c),
            Command::CaseClause(c) => NodeRef::CaseClause(c),
            Command::Block(c) => NodeRef::Block(c),
            Command::Subshell(c) => NodeRef::Subshell(c),
            Command::BinaryCmd(c) => NodeRef::BinaryCmd(c),
            Command::FuncDecl(c) => NodeRef::FuncDecl(c),
            Command::ArithmCmd(c) => NodeRef::ArithmCmd(c),
            Command::TestClause(c) => NodeRef::TestClause(c),
            Command::TimeClause(c) => NodeRef::TimeClause(c),
        }
    }
}

impl<'a> From<&'a WordPart> for NodeRef<'a> {
    fn from(part: &'a WordPart) -> Self {
        match part {
            WordPart::Lit(p) => NodeRef::Lit(p),
            WordPart::SglQuoted(p) => NodeRef::SglQuoted(p),
            WordPart::DblQuoted(p) => NodeRef::DblQuoted(p),
            WordPart::ParamExp(p) => NodeRef::ParamExp(p),
            WordPart::CmdSubst(p) => NodeRef::CmdSubst(p),
            WordPart::ArithmExp(p) => NodeRef::ArithmExp(p),
            WordPart::ProcSubst(p) => NodeRef::ProcSubst(p),
            WordPart::ExtGlob(p) => NodeRef::ExtGlob(p),
        }
    }
}

impl<'a> From<&'a ArithmExpr> for NodeRef<'a> {
    fn from(expr: &'a ArithmExpr) -> Self {
        match expr {
            ArithmExpr::BinaryArithm(x) => NodeRef::BinaryArithm(x),
            ArithmExpr::UnaryArithm(x) => NodeRef::UnaryArithm(x),
            ArithmExpr::ParenArithm(x) => NodeRef::ParenArithm(x),
            ArithmExpr::Word(w) => NodeRef::Word(w),
        }
    }
}

impl<'a> From<&'a TestExpr> for NodeRef<'a> {
    fn from(expr: &'a TestExpr) -> Self {
        match expr {
            TestExpr::BinaryTest(x) => NodeRef::BinaryTest(x),
            TestExpr::UnaryTest(x) => NodeRef::UnaryTest(x),
            TestExpr::ParenTest(x) => NodeRef::ParenTest(x),
            TestExpr::Word(w) => NodeRef::Word(w),
        }
    }
}

impl<'a> From<&'a Loop> for NodeRef<'a> {
    fn from(looper: &'a Loop) -> Self {
        match looper {
            Loop::WordIter(w) => NodeRef::WordIter(w),
            Loop::CStyleLoop(c) => NodeRef::CStyleLoop(c),
        }
    }
}

/// Walk `node` and all of its descendants.
///
/// `visit` returning `false` skips the children of that node and its
/// closing `None` call; siblings are still visited.
pub fn walk<'a, F>(node: NodeRef<'a>, visit: &mut F)
where
    F: FnMut(Option<NodeRef<'a>>) -> bool,
{
    if !visit(Some(node)) {
        return;
    }

    match node {
        NodeRef::File(f) => walk_stmt_list(&f.stmts, visit),
        NodeRef::Comment(_) | NodeRef::Lit(_) | NodeRef::SglQuoted(_) => {}
        NodeRef::Stmt(s) => {
            walk_all(&s.comments, visit);
            if let Some(cmd) = &s.cmd {
                walk(cmd.into(), visit);
            }
            walk_all(&s.redirs, visit);
            if let Some(trailing) = &s.trailing {
                walk(trailing.into(), visit);
            }
        }
        NodeRef::CallExpr(c) => {
            walk_all(&c.assigns, visit);
            walk_all(&c.args, visit);
        }
        NodeRef::IfClause(c) => {
            walk_stmt_list(&c.cond, visit);
            walk_stmt_list(&c.then, visit);
            walk_all(&c.elifs, visit);
            if let Some(stmts) = &c.else_stmts {
                walk_stmt_list(stmts, visit);
            }
        }
        NodeRef::Elif(c) => {
            walk_stmt_list(&c.cond, visit);
            walk_stmt_list(&c.then, visit);
        }
        NodeRef::WhileClause(c) => {
            walk_stmt_list(&c.cond, visit);
            walk_stmt_list(&c.body, visit);
        }
        NodeRef::ForClause(c) => {
            walk((&c.looper).into(), visit);
            walk_stmt_list(&c.body, visit);
        }
        NodeRef::WordIter(w) => {
            walk((&w.name).into(), visit);
            walk_all(&w.items, visit);
        }
        NodeRef::CStyleLoop(l) => {
            for expr in [&l.init, &l.cond, &l.post].into_iter().flatten() {
                walk(expr.into(), visit);
            }
        }
        NodeRef::CaseClause(c) => {
            walk((&c.word).into(), visit);
            walk_all(&c.items, visit);
            walk_all(&c.last, visit);
        }
        NodeRef::CaseItem(c) => {
            walk_all(&c.comments, visit);
            walk_all(&c.patterns, visit);
            walk_stmt_list(&c.stmts, visit);
        }
        NodeRef::Block(b) => walk_stmt_list(&b.stmts, visit),
        NodeRef::Subshell(s) => walk_stmt_list(&s.stmts, visit),
        NodeRef::BinaryCmd(b) => {
            walk(NodeRef::Stmt(&b.x), visit);
            walk(NodeRef::Stmt(&b.y), visit);
        }
        NodeRef::FuncDecl(f) => {
            walk((&f.name).into(), visit);
            walk(NodeRef::Stmt(&f.body), visit);
        }
        NodeRef::ArithmCmd(a) => walk((&a.x).into(), visit),
        NodeRef::TestClause(t) => walk((&t.x).into(), visit),
        NodeRef::TimeClause(t) => {
            if let Some(stmt) = &t.stmt {
                walk(NodeRef::Stmt(stmt), visit);
            }
        }
        NodeRef::Assign(a) => {
            walk((&a.name).into(), visit);
            if let Some(index) = &a.index {
                walk(index.into(), visit);
            }
            if let Some(value) = &a.value {
                walk(value.into(), visit);
            }
            if let Some(array) = &a.array {
                walk(array.into(), visit);
            }
        }
        NodeRef::ArrayExpr(a) => walk_all(&a.elems, visit),
        NodeRef::ArrayElem(e) => {
            if let Some(index) = &e.index {
                walk(index.into(), visit);
            }
            walk((&e.value).into(), visit);
        }
        NodeRef::Redirect(r) => {
            if let Some(n) = &r.n {
                walk(n.into(), visit);
            }
            walk((&r.word).into(), visit);
            if let Some(hdoc) = &r.hdoc {
                walk(hdoc.into(), visit);
            }
        }
        NodeRef::Word(w) => walk_all(&w.parts, visit),
        NodeRef::DblQuoted(q) => walk_all(&q.parts, visit),
        NodeRef::ParamExp(p) => {
            walk((&p.param).into(), visit);
            if let Some(index) = &p.index {
                walk(index.into(), visit);
            }
            if let Some(slice) = &p.slice {
                walk((&slice.offset).into(), visit);
                if let Some(length) = &slice.length {
                    walk(length.into(), visit);
                }
            }
            if let Some(repl) = &p.repl {
                walk((&repl.orig).into(), visit);
                if let Some(with) = &repl.with {
                    walk(with.into(), visit);
                }
            }
            if let Some(word) = p.exp.as_ref().and_then(|exp| exp.word.as_ref()) {
                walk(word.into(), visit);
            }
        }
        NodeRef::CmdSubst(c) => walk_stmt_list(&c.stmts, visit),
        NodeRef::ArithmExp(a) => walk((&a.x).into(), visit),
        NodeRef::ProcSubst(p) => walk_stmt_list(&p.stmts, visit),
        NodeRef::ExtGlob(g) => walk((&g.pattern).into(), visit),
        NodeRef::BinaryArithm(b) => {
            walk((&b.x).into(), visit);
            walk((&b.y).into(), visit);
        }
        NodeRef::UnaryArithm(u) => walk((&u.x).into(), visit),
        NodeRef::ParenArithm(p) => walk((&p.x).into(), visit),
        NodeRef::BinaryTest(b) => {
            walk((&b.x).into(), visit);
            walk((&b.y).into(), visit);
        }
        NodeRef::UnaryTest(u) => walk((&u.x).into(), visit),
        NodeRef::ParenTest(p) => walk((&p.x).into(), visit),
    }

    visit(None);
}

fn walk_stmt_list<'a, F>(list: &'a StmtList, visit: &mut F)
where
    F: FnMut(Option<NodeRef<'a>>) -> bool,
{
    walk_all(&list.stmts, visit);
    walk_all(&list.last, visit);
}

fn walk_all<'a, T, F>(nodes: &'a [T], visit: &mut F)
where
    &'a T: Into<NodeRef<'a>>,
    F: FnMut(Option<NodeRef<'a>>) -> bool,
{
    for node in nodes {
        walk(node.into(), visit);
    }
}
