//! Syntax Tree Types for POSIX-family Shells
//!
//! This module defines the complete node set produced by the parser.
//! Every node owns its children; positions are kept on the nodes so that
//! callers can map any piece of the tree back to the source.

use std::fmt;

use serde::{Serialize, Serializer};

pub use super::position::Position;

/// Defines an operator enum together with its source spelling.
macro_rules! operators {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal,)+ }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }

            pub fn from_str(s: &str) -> Option<Self> {
                match s {
                    $($text => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}

// =============================================================================
// FILE & STATEMENTS
// =============================================================================

/// Root node: a complete parsed input
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct File {
    pub name: String,
    pub stmts: StmtList,
    /// Position just past the last byte that was parsed
    pub end: Position,
}

/// Ordered statements plus the comments that follow the last one
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StmtList {
    pub stmts: Vec<Stmt>,
    pub last: Vec<Comment>,
}

impl StmtList {
    pub fn len(&self) -> usize {
        self.stmts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty() && self.last.is_empty()
    }
}

/// A `#` comment. `text` does not include the hash sign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub hash: Position,
    pub text: String,
}

/// A command with its statement-level decorations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stmt {
    /// Comments on the lines before the statement
    pub comments: Vec<Comment>,
    pub position: Position,
    /// Position of the `;`, `&` or `|&` terminator, if any
    pub semicolon: Position,
    /// `! cmd`
    pub negated: bool,
    /// `cmd &`
    pub background: bool,
    /// `None` for a statement made only of redirections
    pub cmd: Option<Command>,
    pub redirs: Vec<Redirect>,
    /// Comment on the same line, after the statement
    pub trailing: Option<Comment>,
}

// =============================================================================
// COMMANDS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "Type")]
pub enum Command {
    CallExpr(CallExpr),
    IfClause(IfClause),
    WhileClause(WhileClause),
    ForClause(ForClause),
    CaseClause(CaseClause),
    Block(Block),
    Subshell(Subshell),
    BinaryCmd(BinaryCmd),
    FuncDecl(FuncDecl),
    ArithmCmd(ArithmCmd),
    TestClause(TestClause),
    TimeClause(TimeClause),
}

/// Simple command: assignments followed by words
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallExpr {
    pub assigns: Vec<Assign>,
    pub args: Vec<Word>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IfClause {
    pub if_pos: Position,
    pub then_pos: Position,
    pub fi_pos: Position,
    pub cond: StmtList,
    pub then: StmtList,
    pub elifs: Vec<Elif>,
    pub else_pos: Position,
    pub else_stmts: Option<StmtList>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Elif {
    pub elif_pos: Position,
    pub then_pos: Position,
    pub cond: StmtList,
    pub then: StmtList,
}

/// `while` loop, or `until` loop when `until` is set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhileClause {
    pub while_pos: Position,
    pub do_pos: Position,
    pub done_pos: Position,
    pub until: bool,
    pub cond: StmtList,
    pub body: StmtList,
}

/// `for` loop, or `select` loop when `select` is set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForClause {
    pub for_pos: Position,
    pub do_pos: Position,
    pub done_pos: Position,
    pub select: bool,
    pub looper: Loop,
    pub body: StmtList,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "Type")]
pub enum Loop {
    WordIter(WordIter),
    CStyleLoop(CStyleLoop),
}

/// `for name [in words]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordIter {
    pub name: Lit,
    /// Position of `in`; `None` when the word list was omitted
    pub in_pos: Option<Position>,
    pub items: Vec<Word>,
}

/// `for ((init; cond; post))`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CStyleLoop {
    pub lparen: Position,
    pub rparen: Position,
    pub init: Option<ArithmExpr>,
    pub cond: Option<ArithmExpr>,
    pub post: Option<ArithmExpr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseClause {
    pub case_pos: Position,
    pub esac_pos: Position,
    pub word: Word,
    pub items: Vec<CaseItem>,
    /// Comments after the last item
    pub last: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseItem {
    pub op: CaseOperator,
    /// Position of the terminator; invalid when the last item omits it
    pub op_pos: Position,
    pub comments: Vec<Comment>,
    pub patterns: Vec<Word>,
    pub stmts: StmtList,
}

/// `{ stmts; }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub lbrace: Position,
    pub rbrace: Position,
    pub stmts: StmtList,
}

/// `( stmts )`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Subshell {
    pub lparen: Position,
    pub rparen: Position,
    pub stmts: StmtList,
}

/// Two statements joined by `&&`, `||`, `|` or `|&`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinaryCmd {
    pub op_pos: Position,
    pub op: BinCmdOperator,
    pub x: Box<Stmt>,
    pub y: Box<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuncDecl {
    pub position: Position,
    /// Declared with the `function` reserved word
    pub rsrv_word: bool,
    pub name: Lit,
    pub body: Box<Stmt>,
}

/// `(( expr ))`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArithmCmd {
    pub left: Position,
    pub right: Position,
    pub x: ArithmExpr,
}

/// `[[ expr ]]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestClause {
    pub left: Position,
    pub right: Position,
    pub x: TestExpr,
}

/// `time [-p] [stmt]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeClause {
    pub time_pos: Position,
    pub posix_format: bool,
    pub stmt: Option<Box<Stmt>>,
}

// =============================================================================
// ASSIGNMENTS & REDIRECTIONS
// =============================================================================

/// `name=value`, `name+=value`, `name[i]=value` or `name=(elems)`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assign {
    pub append: bool,
    pub name: Lit,
    pub index: Option<ArithmExpr>,
    pub value: Option<Word>,
    pub array: Option<ArrayExpr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayExpr {
    pub lparen: Position,
    pub rparen: Position,
    pub elems: Vec<ArrayElem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayElem {
    pub index: Option<ArithmExpr>,
    pub value: Word,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Redirect {
    pub op_pos: Position,
    pub op: RedirOperator,
    /// Explicit file descriptor, as in `2>`
    pub n: Option<Lit>,
    pub word: Word,
    /// Here-document body for `<<` and `<<-`
    pub hdoc: Option<Word>,
}

// =============================================================================
// WORDS
// =============================================================================

/// A shell word: the concatenation of its parts
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Word {
    pub parts: Vec<WordPart>,
}

impl Word {
    /// The literal value of the word if it is made of a single literal part.
    pub fn lit(&self) -> Option<&str> {
        match self.parts.as_slice() {
            [WordPart::Lit(lit)] => Some(&lit.value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "Type")]
pub enum WordPart {
    Lit(Lit),
    SglQuoted(SglQuoted),
    DblQuoted(DblQuoted),
    ParamExp(Box<ParamExp>),
    CmdSubst(CmdSubst),
    ArithmExp(ArithmExp),
    ProcSubst(ProcSubst),
    ExtGlob(ExtGlob),
}

/// Unquoted text, kept exactly as written (escapes included)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lit {
    pub value_pos: Position,
    pub value_end: Position,
    pub value: String,
}

/// `'text'`, or `$'text'` when `dollar` is set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SglQuoted {
    pub left: Position,
    pub right: Position,
    pub dollar: bool,
    pub value: String,
}

/// `"parts"`, or `$"parts"` when `dollar` is set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DblQuoted {
    pub left: Position,
    pub right: Position,
    pub dollar: bool,
    pub parts: Vec<WordPart>,
}

/// `$(stmts)`, `` `stmts` ``, `${ stmts;}` or `${|stmts;}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CmdSubst {
    pub left: Position,
    pub right: Position,
    pub stmts: StmtList,
    pub backquotes: bool,
    /// mksh `${ stmts;}`
    pub temp_file: bool,
    /// mksh `${|stmts;}`
    pub reply_var: bool,
}

/// Parameter expansion: `$name` or `${...}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamExp {
    pub dollar: Position,
    pub rbrace: Position,
    /// `$name` without braces
    pub short: bool,
    /// `${!name}`
    pub excl: bool,
    /// `${#name}`
    pub length: bool,
    /// mksh `${%name}`
    pub width: bool,
    pub param: Lit,
    pub index: Option<ArithmExpr>,
    pub slice: Option<Slice>,
    pub repl: Option<Replace>,
    pub names: Option<ParNamesOperator>,
    pub exp: Option<Expansion>,
}

/// `${name:offset:length}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub offset: ArithmExpr,
    pub length: Option<ArithmExpr>,
}

/// `${name/orig/with}` or `${name//orig/with}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Replace {
    pub all: bool,
    pub orig: Word,
    pub with: Option<Word>,
}

/// `${name op word}` such as `${a:-default}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expansion {
    pub op: ParExpOperator,
    pub word: Option<Word>,
}

/// `$((expr))`, or `$[expr]` when `bracket` is set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArithmExp {
    pub left: Position,
    pub right: Position,
    pub bracket: bool,
    pub x: ArithmExpr,
}

/// `<(stmts)` or `>(stmts)`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcSubst {
    pub op_pos: Position,
    pub rparen: Position,
    pub op: ProcOperator,
    pub stmts: StmtList,
}

/// `@(pattern)` and the other extended globs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtGlob {
    pub op_pos: Position,
    pub op: GlobOperator,
    pub pattern: Lit,
}

// =============================================================================
// ARITHMETIC & TEST EXPRESSIONS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "Type")]
pub enum ArithmExpr {
    BinaryArithm(Box<BinaryArithm>),
    UnaryArithm(Box<UnaryArithm>),
    ParenArithm(Box<ParenArithm>),
    Word(Word),
}

/// Binary arithmetic; `a ? b : c` is `?` with a `:` node on its right
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinaryArithm {
    pub op_pos: Position,
    pub op: BinAritOperator,
    pub x: ArithmExpr,
    pub y: ArithmExpr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnaryArithm {
    pub op_pos: Position,
    pub op: UnAritOperator,
    /// Postfix operator, as in `i++`
    pub post: bool,
    pub x: ArithmExpr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParenArithm {
    pub lparen: Position,
    pub rparen: Position,
    pub x: ArithmExpr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "Type")]
pub enum TestExpr {
    BinaryTest(Box<BinaryTest>),
    UnaryTest(Box<UnaryTest>),
    ParenTest(Box<ParenTest>),
    Word(Word),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinaryTest {
    pub op_pos: Position,
    pub op: BinTestOperator,
    pub x: TestExpr,
    pub y: TestExpr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnaryTest {
    pub op_pos: Position,
    pub op: UnTestOperator,
    pub x: TestExpr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParenTest {
    pub lparen: Position,
    pub rparen: Position,
    pub x: TestExpr,
}

// =============================================================================
// OPERATORS
// =============================================================================

operators! {
    BinCmdOperator {
        AndStmt => "&&",
        OrStmt => "||",
        Pipe => "|",
        PipeAll => "|&",
    }
}

operators! {
    CaseOperator {
        Break => ";;",
        Fallthrough => ";&",
        Resume => ";;&",
        ResumeKorn => ";|",
    }
}

operators! {
    RedirOperator {
        RdrOut => ">",
        AppOut => ">>",
        RdrIn => "<",
        RdrInOut => "<>",
        DplIn => "<&",
        DplOut => ">&",
        ClbOut => ">|",
        Hdoc => "<<",
        DashHdoc => "<<-",
        WordHdoc => "<<<",
        RdrAll => "&>",
        AppAll => "&>>",
    }
}

operators! {
    ProcOperator {
        CmdIn => "<(",
        CmdOut => ">(",
    }
}

operators! {
    GlobOperator {
        ZeroOrOne => "?(",
        ZeroOrMore => "*(",
        OneOrMore => "+(",
        One => "@(",
        Except => "!(",
    }
}

operators! {
    ParExpOperator {
        AlternateUnset => "+",
        AlternateUnsetOrNull => ":+",
        DefaultUnset => "-",
        DefaultUnsetOrNull => ":-",
        ErrorUnset => "?",
        ErrorUnsetOrNull => ":?",
        AssignUnset => "=",
        AssignUnsetOrNull => ":=",
        RemSmallSuffix => "%",
        RemLargeSuffix => "%%",
        RemSmallPrefix => "#",
        RemLargePrefix => "##",
        UpperFirst => "^",
        UpperAll => "^^",
        LowerFirst => ",",
        LowerAll => ",,",
        OtherParamOps => "@",
    }
}

operators! {
    ParNamesOperator {
        NamesPrefix => "*",
        NamesPrefixWords => "@",
    }
}

operators! {
    BinAritOperator {
        Add => "+",
        Sub => "-",
        Mul => "*",
        Quo => "/",
        Rem => "%",
        Pow => "**",
        Eql => "==",
        Gtr => ">",
        Lss => "<",
        Neq => "!=",
        Leq => "<=",
        Geq => ">=",
        And => "&",
        Or => "|",
        Xor => "^",
        Shr => ">>",
        Shl => "<<",
        AndArit => "&&",
        OrArit => "||",
        Comma => ",",
        TernQuest => "?",
        TernColon => ":",
        Assgn => "=",
        AddAssgn => "+=",
        SubAssgn => "-=",
        MulAssgn => "*=",
        QuoAssgn => "/=",
        RemAssgn => "%=",
        AndAssgn => "&=",
        OrAssgn => "|=",
        XorAssgn => "^=",
        ShlAssgn => "<<=",
        ShrAssgn => ">>=",
    }
}

operators! {
    UnAritOperator {
        Not => "!",
        BitNegation => "~",
        Inc => "++",
        Dec => "--",
        Plus => "+",
        Minus => "-",
    }
}

operators! {
    BinTestOperator {
        ReMatch => "=~",
        Newer => "-nt",
        Older => "-ot",
        DevIno => "-ef",
        Eql => "-eq",
        Neq => "-ne",
        Leq => "-le",
        Geq => "-ge",
        Lss => "-lt",
        Gtr => "-gt",
        AndTest => "&&",
        OrTest => "||",
        MatchShort => "=",
        Match => "==",
        NoMatch => "!=",
        Before => "<",
        After => ">",
    }
}

operators! {
    UnTestOperator {
        Exists => "-e",
        ExistsOld => "-a",
        RegFile => "-f",
        Direct => "-d",
        CharSp => "-c",
        BlckSp => "-b",
        NmPipe => "-p",
        Socket => "-S",
        SmbLink => "-L",
        SmbLinkOld => "-h",
        Sticky => "-k",
        GidSet => "-g",
        UidSet => "-u",
        GrpOwn => "-G",
        UsrOwn => "-O",
        Modif => "-N",
        Read => "-r",
        Write => "-w",
        Exec => "-x",
        NoEmpty => "-s",
        FdTerm => "-t",
        EmpStr => "-z",
        NempStr => "-n",
        OptSet => "-o",
        VarSet => "-v",
        RefVar => "-R",
        Not => "!",
    }
}

// =============================================================================
// POSITIONS
// =============================================================================

impl Stmt {
    pub fn pos(&self) -> Position {
        self.position
    }

    pub fn end(&self) -> Position {
        if let Some(trailing) = &self.trailing {
            return trailing.end();
        }
        if self.semicolon.is_valid() {
            return self.semicolon.shifted(1);
        }
        let mut end = self.position;
        if let Some(cmd) = &self.cmd {
            end = cmd.end();
        }
        for redir in &self.redirs {
            let redir_end = redir.end();
            if redir_end.after(end) {
                end = redir_end;
            }
        }
        end
    }
}

impl Comment {
    pub fn pos(&self) -> Position {
        self.hash
    }

    pub fn end(&self) -> Position {
        self.hash.shifted(1 + self.text.len())
    }
}

impl Command {
    pub fn pos(&self) -> Position {
        match self {
            Self::CallExpr(c) => c.pos(),
            Self::IfClause(c) => c.if_pos,
            Self::WhileClause(c) => c.while_pos,
            Self::ForClause(c) => c.for_pos,
            Self::CaseClause(c) => c.case_pos,
            Self::Block(c) => c.lbrace,
            Self::Subshell(c) => c.lparen,
            Self::BinaryCmd(c) => c.x.pos(),
            Self::FuncDecl(c) => c.position,
            Self::ArithmCmd(c) => c.left,
            Self::TestClause(c) => c.left,
            Self::TimeClause(c) => c.time_pos,
        }
    }

    pub fn end(&self) -> Position {
        match self {
            Self::CallExpr(c) => c.end(),
            Self::IfClause(c) => c.fi_pos.shifted(2),
            Self::WhileClause(c) => c.done_pos.shifted(4),
            Self::ForClause(c) => c.done_pos.shifted(4),
            Self::CaseClause(c) => c.esac_pos.shifted(4),
            Self::Block(c) => c.rbrace.shifted(1),
            Self::Subshell(c) => c.rparen.shifted(1),
            Self::BinaryCmd(c) => c.y.end(),
            Self::FuncDecl(c) => c.body.end(),
            Self::ArithmCmd(c) => c.right.shifted(2),
            Self::TestClause(c) => c.right.shifted(2),
            Self::TimeClause(c) => match &c.stmt {
                Some(stmt) => stmt.end(),
                None => c.time_pos.shifted(4),
            },
        }
    }
}

impl CallExpr {
    pub fn pos(&self) -> Position {
        match (self.assigns.first(), self.args.first()) {
            (Some(assign), _) => assign.pos(),
            (None, Some(arg)) => arg.pos(),
            (None, None) => Position::default(),
        }
    }

    pub fn end(&self) -> Position {
        match (self.args.last(), self.assigns.last()) {
            (Some(arg), _) => arg.end(),
            (None, Some(assign)) => assign.end(),
            (None, None) => Position::default(),
        }
    }
}

impl Assign {
    pub fn pos(&self) -> Position {
        self.name.value_pos
    }

    pub fn end(&self) -> Position {
        if let Some(array) = &self.array {
            return array.rparen.shifted(1);
        }
        if let Some(value) = &self.value {
            return value.end();
        }
        // `name=` with an empty value: the `=` follows the name
        self.name.value_end.shifted(if self.append { 2 } else { 1 })
    }
}

impl Redirect {
    pub fn pos(&self) -> Position {
        match &self.n {
            Some(n) => n.value_pos,
            None => self.op_pos,
        }
    }

    pub fn end(&self) -> Position {
        self.word.end()
    }
}

impl Word {
    pub fn pos(&self) -> Position {
        self.parts.first().map(WordPart::pos).unwrap_or_default()
    }

    pub fn end(&self) -> Position {
        self.parts.last().map(WordPart::end).unwrap_or_default()
    }
}

impl WordPart {
    pub fn pos(&self) -> Position {
        match self {
            Self::Lit(p) => p.value_pos,
            Self::SglQuoted(p) => p.left,
            Self::DblQuoted(p) => p.left,
            Self::ParamExp(p) => p.dollar,
            Self::CmdSubst(p) => p.left,
            Self::ArithmExp(p) => p.left,
            Self::ProcSubst(p) => p.op_pos,
            Self::ExtGlob(p) => p.op_pos,
        }
    }

    pub fn end(&self) -> Position {
        match self {
            Self::Lit(p) => p.value_end,
            Self::SglQuoted(p) => p.right.shifted(1),
            Self::DblQuoted(p) => p.right.shifted(1),
            Self::ParamExp(p) => {
                if p.short {
                    p.param.value_end
                } else {
                    p.rbrace.shifted(1)
                }
            }
            Self::CmdSubst(p) => p.right.shifted(1),
            Self::ArithmExp(p) => p.right.shifted(if p.bracket { 1 } else { 2 }),
            Self::ProcSubst(p) => p.rparen.shifted(1),
            Self::ExtGlob(p) => p.pattern.value_end.shifted(1),
        }
    }
}

impl ArithmExpr {
    pub fn pos(&self) -> Position {
        match self {
            Self::BinaryArithm(x) => x.x.pos(),
            Self::UnaryArithm(x) => {
                if x.post {
                    x.x.pos()
                } else {
                    x.op_pos
                }
            }
            Self::ParenArithm(x) => x.lparen,
            Self::Word(w) => w.pos(),
        }
    }

    pub fn end(&self) -> Position {
        match self {
            Self::BinaryArithm(x) => x.y.end(),
            Self::UnaryArithm(x) => {
                if x.post {
                    x.op_pos.shifted(2)
                } else {
                    x.x.end()
                }
            }
            Self::ParenArithm(x) => x.rparen.shifted(1),
            Self::Word(w) => w.end(),
        }
    }
}

impl TestExpr {
    pub fn pos(&self) -> Position {
        match self {
            Self::BinaryTest(x) => x.x.pos(),
            Self::UnaryTest(x) => x.op_pos,
            Self::ParenTest(x) => x.lparen,
            Self::Word(w) => w.pos(),
        }
    }

    pub fn end(&self) -> Position {
        match self {
            Self::BinaryTest(x) => x.y.end(),
            Self::UnaryTest(x) => x.x.end(),
            Self::ParenTest(x) => x.rparen.shifted(1),
            Self::Word(w) => w.end(),
        }
    }
}

// =============================================================================
// FACTORY FUNCTIONS (AST builders)
// =============================================================================

/// Builders for nodes whose positions are not known or not relevant
pub struct AST;

impl AST {
    pub fn lit(value: impl Into<String>) -> Lit {
        Lit {
            value_pos: Position::default(),
            value_end: Position::default(),
            value: value.into(),
        }
    }

    pub fn word(parts: Vec<WordPart>) -> Word {
        Word { parts }
    }

    pub fn lit_word(value: impl Into<String>) -> Word {
        Word {
            parts: vec![WordPart::Lit(Self::lit(value))],
        }
    }

    pub fn stmt(cmd: Command) -> Stmt {
        Stmt {
            comments: Vec::new(),
            position: Position::default(),
            semicolon: Position::default(),
            negated: false,
            background: false,
            cmd: Some(cmd),
            redirs: Vec::new(),
            trailing: None,
        }
    }

    pub fn call(args: Vec<Word>) -> Command {
        Command::CallExpr(CallExpr {
            assigns: Vec::new(),
            args,
        })
    }

    pub fn binary(op: BinCmdOperator, x: Stmt, y: Stmt) -> Command {
        Command::BinaryCmd(BinaryCmd {
            op_pos: Position::default(),
            op,
            x: Box::new(x),
            y: Box::new(y),
        })
    }

    pub fn file(stmts: Vec<Stmt>) -> File {
        File {
            name: String::new(),
            stmts: StmtList {
                stmts,
                last: Vec::new(),
            },
            end: Position::default(),
        }
    }
}
