use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use front_util::{BoxError, LinedString, Position};
use crate::environment::{DeclKind, Declaration, Environment};
use crate::expr::{BinderKind, Expr, ExprKind};
use crate::ios::{IoState, Options};
use crate::name::Name;
use crate::parser::{ErrorKind, ErrorLevel, ErrorMode, Namespaces, Parser, ParserBuilder,
  ParserState, PosTable, Scanner, ScopeKind, ScopeStack, TokenKind, DEFAULT_MAX_DEPTH};
use crate::script::ScriptEngine;

/// An output channel the test can read back.
#[derive(Clone, Default)]
struct Capture(Rc<RefCell<Vec<u8>>>);

impl Write for Capture {
  fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
    self.0.borrow_mut().extend_from_slice(buf);
    Ok(buf.len())
  }
  fn flush(&mut self) -> io::Result<()> { Ok(()) }
}

impl Capture {
  fn lines(&self) -> Vec<String> {
    String::from_utf8_lossy(&self.0.borrow()).lines().map(str::to_owned).collect()
  }
}

fn builder() -> ParserBuilder {
  ParserBuilder { ios: IoState::sink(), ..ParserBuilder::default() }
}

fn parser(s: &str) -> Parser { builder().build_str(s) }

/// Run `s` in tolerant mode, returning the parser and everything `check` printed.
fn run_capture(s: &str) -> (Parser, Vec<String>) {
  let out = Capture::default();
  let mut ios = IoState::new(Box::new(out.clone()));
  ios.options.remove(Options::SHOW_ERRORS);
  let mut p = ParserBuilder { ios, ..ParserBuilder::default() }.build_str(s);
  p.run().expect("tolerant mode never fails");
  (p, out.lines())
}

const ARITH: &str = "\
axiom A : Type
axiom a : A
axiom b : A
axiom c : A
axiom f : A → A
axiom add : A → A → A
axiom mul : A → A → A
axiom pow : A → A → A
infixl \"+\" : 65 := add
infixl \"*\" : 70 := mul
infixr \"^\" : 75 := pow
";

fn check_arith(exprs: &[&str]) -> Vec<String> {
  let mut s = ARITH.to_owned();
  for e in exprs { s += &format!("check {e}\n") }
  let (p, out) = run_capture(&s);
  assert!(p.diagnostics().is_empty(), "{:?}", p.diagnostics());
  out
}

#[test]
fn binding_powers() {
  let out = check_arith(&[
    "a + b * c",
    "a * b + c",
    "a + b + c",
    "a ^ b ^ c",
    "f a + b",
    "(a + b) * c",
  ]);
  assert_eq!(out, [
    "(add a (mul b c))",
    "(add (mul a b) c)",
    "(add (add a b) c)",
    "(pow a (pow b c))",
    "(add (f a) b)",
    "(mul (add a b) c)",
  ]);
}

#[test]
fn application_and_arrows() {
  let out = check_arith(&[
    "add a b",
    "add (f a) b",
    "A → A → A",
    "A -> A",
  ]);
  assert_eq!(out, [
    "(add a b)",
    "(add (f a) b)",
    "(Pi (_ : A) (Pi (_ : A) A))",
    "(Pi (_ : A) A)",
  ]);
}

#[test]
fn binder_expressions() {
  let out = check_arith(&[
    "fun (x : A), f x",
    "λ x y, add x y",
    "Pi {x : A}, A",
    "∀ [x : A] (y : A), A",
    "let x : A := a in f x",
    "fun x, fun x, x",
  ]);
  assert_eq!(out, [
    "(fun (x : A) (f x))",
    "(fun (x : _) (fun (y : _) (add x y)))",
    "(Pi {x : A} A)",
    "(Pi [x : A] (Pi (y : A) A))",
    "(let x : A := a in (f x))",
    "(fun (x : _) (fun (x : _) x))",
  ]);
}

#[test]
fn shadowed_local_refers_to_inner_binder() {
  let mut p = parser("fun x, fun x, x");
  let e = p.parse_expr(0).expect("parse");
  let ExprKind::Lambda(outer, body) = e.kind() else { panic!("expected lambda, got {e}") };
  let ExprKind::Lambda(inner, body) = body.kind() else { panic!("expected lambda, got {body}") };
  assert_ne!(outer.idx, inner.idx);
  assert_eq!(body.as_local(), Some((&Name::atom("x"), inner.idx)));
}

#[test]
fn notations() {
  let src = format!("{ARITH}\
axiom not : A → A
axiom fact : A → A
axiom ite : A → A → A → A
prefix \"¬\" : 40 := not
postfix \"!\" : 100 := fact
notation \"if\" x \"then\" y \"else\" z := ite
check ¬ a + b
check a! * b
check if a then b else c + a
");
  let (p, out) = run_capture(&src);
  assert!(p.diagnostics().is_empty(), "{:?}", p.diagnostics());
  assert_eq!(out, [
    "(not (add a b))",
    "(mul (fact a) b)",
    "(ite a b (add c a))",
  ]);
}

#[test]
fn bad_notation_declarations() {
  let (p, _) = run_capture("axiom a : Type\ninfixl \"\" : 10 := a\ninfixl \"x y\" : 10 := a\n\
    infixl \"%\" : 1.5 := a\ninfixl \"%\" : 10 := nope");
  let kinds: Vec<_> = p.diagnostics().iter().map(|e| e.kind).collect();
  assert_eq!(kinds, [ErrorKind::Syntax, ErrorKind::Syntax, ErrorKind::Syntax, ErrorKind::NameResolution]);
}

#[test]
fn numerals_and_strings() {
  let (p, out) = run_capture("check 42\ncheck 3.25\ncheck \"a\\tb\\x41\"");
  assert!(p.diagnostics().is_empty(), "{:?}", p.diagnostics());
  assert_eq!(out, ["42", "13/4", "\"a\\tbA\""]);
}

#[test]
fn scope_stack_shadowing() {
  let x = Name::atom("x");
  let mut s = ScopeStack::default();
  s.push();
  s.insert(x.clone(), Expr::local(x.clone(), 0), 0);
  s.push();
  s.insert(x.clone(), Expr::local(x.clone(), 1), 1);
  assert_eq!(s.lookup(&x).map(|(_, i)| i), Some(1));
  s.pop();
  assert_eq!(s.lookup(&x).map(|(_, i)| i), Some(0));
  s.pop();
  assert!(s.lookup(&x).is_none());
  assert!(s.is_empty());
  assert_eq!(s.depth(), 0);
}

#[test]
fn scoped_expr_uses_given_locals() {
  let x = Name::atom("x");
  let mut p = parser("x");
  let e = p.parse_scoped_expr(&[Expr::local(x.clone(), 7)], 0).expect("parse");
  assert_eq!(e.as_local(), Some((&x, 7)));
  assert!(p.lookup_local(&x).is_none());
}

#[test]
fn scoped_expr_cleans_up_on_error() {
  let x = Name::atom("x");
  let mut p = parser("(x");
  let e = p.parse_scoped_expr(&[Expr::local(x.clone(), 0)], 0).expect_err("unclosed paren");
  assert_eq!(e.kind, ErrorKind::Syntax);
  assert!(p.lookup_local(&x).is_none());
}

#[test]
fn scoped_expr_rejects_non_locals() {
  let mut p = parser("x");
  let e = p.parse_scoped_expr(&[Expr::hole()], 0).expect_err("not a local");
  assert_eq!(e.kind, ErrorKind::Syntax);
}

#[test]
fn tags_are_per_node() {
  let x = Name::atom("x");
  let mut p = parser("x x");
  let e = p.parse_scoped_expr(&[Expr::local(x, 0)], 0).expect("parse");
  let ExprKind::App(f, args) = e.kind() else { panic!("expected application, got {e}") };
  let table = p.pos_table();
  let (tf, ta) = (table.tag_of(f).expect("tagged"), table.tag_of(&args[0]).expect("tagged"));
  assert_ne!(tf, ta);
  assert_eq!(table.pos_of_tag(tf), Some(Position::new(1, 0)));
  assert_eq!(table.pos_of_tag(ta), Some(Position::new(1, 2)));
  assert_eq!(table.pos_of(&e), Some(Position::new(1, 0)));
  assert_eq!(table.tag_of(&args[0].fresh()), None);
}

#[test]
fn binder_kinds_and_dependencies() {
  let mut p = parser("(x y : Type) {z : x} [i : Prop] ⦃w : z⦄ {{v : Type}} u");
  let params = p.scoped(|p| {
    let mut out = vec![];
    p.parse_binders(&mut out)?;
    Ok(out)
  }).expect("parse");
  let kinds: Vec<_> = params.iter().map(|x| x.kind).collect();
  assert_eq!(kinds, [
    BinderKind::Explicit, BinderKind::Explicit, BinderKind::Implicit, BinderKind::InstImplicit,
    BinderKind::StrictImplicit, BinderKind::StrictImplicit, BinderKind::Explicit,
  ]);
  assert_eq!(params[2].ty.as_local(), Some((&Name::atom("x"), params[0].idx)));
  assert_eq!(params[4].ty.as_local(), Some((&Name::atom("z"), params[2].idx)));
  assert!(matches!(params[6].ty.kind(), ExprKind::Hole));
  assert!(matches!(p.curr(), TokenKind::Eof));
  assert!(p.lookup_local(&Name::atom("x")).is_none());
}

#[test]
fn binder_type_does_not_see_its_own_names() {
  let mut p = parser("(x : x)");
  let e = p.scoped(|p| p.parse_binder()).expect_err("x is not in scope yet");
  assert_eq!(e.kind, ErrorKind::NameResolution);
}

#[test]
fn single_binder() {
  let mut p = parser("{x : Type} (y z : Type)");
  let x = p.scoped(|p| p.parse_binder()).expect("parse");
  assert_eq!((x.name, x.kind), (Name::atom("x"), BinderKind::Implicit));
  let e = p.scoped(|p| p.parse_binder()).expect_err("two names");
  assert_eq!(e.kind, ErrorKind::Syntax);
}

#[test]
fn namespace_stack() {
  let (foo, bar) = (Name::atom("Foo"), Name::atom("Bar"));
  let mut ns = Namespaces::default();
  ns.push(ScopeKind::Namespace, Some(foo.clone()));
  ns.push(ScopeKind::Scope, None);
  ns.push(ScopeKind::Namespace, Some(bar.clone()));
  assert_eq!(ns.prefix(), Name::from_dotted("Foo.Bar"));
  assert!(ns.pop(Some(ScopeKind::Namespace), Some(&foo)).is_err());
  assert_eq!(ns.depth(), 3);
  assert_eq!(ns.pop(None, Some(&bar)), Ok(ScopeKind::Namespace));
  assert_eq!(ns.prefix(), foo);
  assert_eq!(ns.pop(Some(ScopeKind::Scope), None), Ok(ScopeKind::Scope));
  assert_eq!(ns.pop(None, None), Ok(ScopeKind::Namespace));
  assert!(ns.prefix().is_anonymous());
  assert!(ns.pop(None, None).is_err());
}

#[test]
fn namespaces_qualify_and_resolve() {
  let (p, out) = run_capture("\
namespace Foo
namespace Bar
axiom T : Type
end Bar
axiom t : Bar.T
check t
end Foo
check Foo.t
end
");
  assert_eq!(out, ["Foo.t", "Foo.t"]);
  let env = p.env();
  assert!(env.get_decl(&Name::from_dotted("Foo.Bar.T")).is_some());
  let t = env.get_decl(&Name::from_dotted("Foo.t")).expect("declared");
  assert_eq!(t.ty.to_string(), "Foo.Bar.T");
  let [e] = p.diagnostics() else { panic!("{:?}", p.diagnostics()) };
  assert_eq!((e.kind, e.pos), (ErrorKind::Scope, Position::new(9, 0)));
}

#[test]
fn mismatched_end() {
  let (p, _) = run_capture("namespace Foo\nend Bar\naxiom T : Type");
  let [e] = p.diagnostics() else { panic!("{:?}", p.diagnostics()) };
  assert_eq!((e.kind, e.pos), (ErrorKind::Scope, Position::new(2, 0)));
  assert_eq!(p.prefix(), Name::atom("Foo"));
  assert!(p.env().get_decl(&Name::from_dotted("Foo.T")).is_some());
}

#[test]
fn empty_input() {
  for s in ["", "  \n\t", "-- nothing here\n/- nor /- here -/ -/"] {
    let mut p = parser(s);
    assert_eq!(p.run().ok(), Some(true));
    assert_eq!(p.state(), ParserState::HaltedClean);
    assert!(p.diagnostics().is_empty());
  }
}

const RECOVERY: &str = "check (\naxiom T : Type\ncheck T\n";

#[test]
fn tolerant_recovery() {
  let (p, out) = run_capture(RECOVERY);
  assert!(p.found_errors());
  assert_eq!(p.diagnostics().len(), 1);
  assert_eq!(p.diagnostics()[0].pos, Position::new(2, 0));
  assert_eq!(out, ["T"]);
  assert_eq!(p.state(), ParserState::HaltedClean);
}

#[test]
fn strict_stops_at_first_error() {
  let mut p = ParserBuilder { mode: ErrorMode::Strict, ..builder() }.build_str(RECOVERY);
  let e = p.run().expect_err("strict mode");
  assert_eq!(e.kind, ErrorKind::Syntax);
  assert_eq!(p.state(), ParserState::HaltedError);
  assert!(p.found_errors());
  assert!(p.env().get_decl(&Name::atom("T")).is_none());
  assert!(p.diagnostics().is_empty());
}

#[test]
fn lexical_errors() {
  for (s, pos, msg) in [
    ("check \"abc", Position::new(1, 6), "unterminated string literal"),
    ("check 12ab", Position::new(1, 6), "malformed numeral"),
    ("axiom T : Type\ncheck $", Position::new(2, 6), "invalid character"),
    ("/- open", Position::new(1, 0), "unterminated comment"),
  ] {
    let (p, _) = run_capture(s);
    let [e] = p.diagnostics() else { panic!("{s}: {:?}", p.diagnostics()) };
    assert_eq!((e.kind, e.level, e.pos), (ErrorKind::Lexical, ErrorLevel::Error, pos), "{s}");
    assert_eq!(e.msg.to_string(), msg);
  }
}

#[test]
fn warnings_are_not_errors() {
  let (p, out) = run_capture("check \"a\\qb\"");
  assert!(!p.found_errors());
  let [e] = p.diagnostics() else { panic!("{:?}", p.diagnostics()) };
  assert_eq!((e.kind, e.level, e.pos), (ErrorKind::Lexical, ErrorLevel::Warning, Position::new(1, 8)));
  assert_eq!(out, ["\"a\\\\qb\""]);
}

#[test]
fn error_display() {
  let (p, _) = run_capture("axiom T : Type\ncheck zzz");
  let [e] = p.diagnostics() else { panic!("{:?}", p.diagnostics()) };
  assert_eq!(e.to_string(), "2:6: name resolution error: unknown identifier 'zzz'");
}

#[test]
fn nesting_depth_is_bounded() {
  let deep = format!("check {}Type{}", "(".repeat(12), ")".repeat(12));
  let mut p = ParserBuilder { max_depth: 10, ..builder() }.build_str(&deep);
  assert_eq!(p.run().ok(), Some(false));
  assert!(p.diagnostics()[0].msg.to_string().contains("maximum nesting depth (10) exceeded"));
  let mut p = parser(&deep);
  assert_eq!(p.run().ok(), Some(true));
}

#[test]
fn default_depth_bound_is_reachable() {
  let n = front_util::u32_as_usize(DEFAULT_MAX_DEPTH) - 1;
  let parens = |n| format!("check {}Type{}", "(".repeat(n), ")".repeat(n));
  let mut p = parser(&parens(n));
  assert_eq!(p.run().ok(), Some(true));
  let mut p = parser(&parens(n + 1));
  assert_eq!(p.run().ok(), Some(false));
  let msg = p.diagnostics()[0].msg.to_string();
  assert!(msg.contains(&format!("maximum nesting depth ({DEFAULT_MAX_DEPTH}) exceeded")), "{msg}");

  let funs = format!("{ARITH}check {}x\n", "fun (x : A), ".repeat(n));
  let (p, out) = run_capture(&funs);
  assert!(p.diagnostics().is_empty(), "{:?}", p.diagnostics());
  assert!(out[0].starts_with("(fun (x : A) (fun (x : A) "));
}

#[test]
fn exit_stops_processing() {
  let mut p = parser("axiom T : Type\nexit\naxiom U : Type\ncheck (");
  assert_eq!(p.run().ok(), Some(true));
  assert_eq!(p.state(), ParserState::HaltedClean);
  let env = p.into_env();
  assert!(env.get_decl(&Name::atom("T")).is_some());
  assert!(env.get_decl(&Name::atom("U")).is_none());
}

#[test]
fn redeclaration() {
  let (p, _) = run_capture("axiom T : Type\naxiom T : Prop");
  let [e] = p.diagnostics() else { panic!("{:?}", p.diagnostics()) };
  assert_eq!(e.pos, Position::new(2, 6));
  assert_eq!(e.msg.to_string(), "'T' has already been declared, previously declared at 1:6");
}

#[test]
fn definitions() {
  let (p, _) = run_capture(&format!("{ARITH}def g (x : A) := f x\ntheorem h {{y : A}} : A := y\n"));
  assert!(p.diagnostics().is_empty(), "{:?}", p.diagnostics());
  let g = p.env().get_decl(&Name::atom("g")).expect("declared");
  assert_eq!(g.ty.to_string(), "(Pi (x : A) _)");
  assert_eq!(g.value.as_ref().map(ToString::to_string).as_deref(), Some("(fun (x : A) (f x))"));
  let h = p.env().get_decl(&Name::atom("h")).expect("declared");
  assert_eq!(h.ty.to_string(), "(Pi {y : A} A)");
}

#[test]
fn theorem_needs_a_type() {
  let (p, _) = run_capture("axiom T : Type\ntheorem t := T");
  let [e] = p.diagnostics() else { panic!("{:?}", p.diagnostics()) };
  assert_eq!(e.kind, ErrorKind::Syntax);
  assert_eq!(e.msg.to_string(), "unexpected token ':=', expected ':'");
}

#[test]
fn structure_variables() {
  let (p, out) = run_capture("\
variable (x : Type)
structure S
variable (x : Type) {y : x}
axiom foo : x
end S
check S.foo
axiom bar : x
");
  assert_eq!(out, ["S.foo"]);
  let kinds: Vec<_> = p.diagnostics().iter().map(|e| e.kind).collect();
  assert_eq!(kinds, [ErrorKind::Scope, ErrorKind::NameResolution]);
  let foo = p.env().get_decl(&Name::from_dotted("S.foo")).expect("declared");
  assert!(matches!(foo.ty.kind(), ExprKind::Local(..)));
}

struct Recorder(Rc<RefCell<Vec<String>>>);

impl ScriptEngine for Recorder {
  fn exec(&mut self, code: &str) -> Result<(), BoxError> {
    if code == "fail" { return Err("script failed".into()) }
    self.0.borrow_mut().push(code.to_owned());
    Ok(())
  }
}

#[test]
fn scripts() {
  let (p, _) = run_capture("script \"go\"");
  let [e] = p.diagnostics() else { panic!("{:?}", p.diagnostics()) };
  assert_eq!(e.msg.to_string(), "no scripting engine is available");

  let log = Rc::new(RefCell::new(vec![]));
  let script: Box<dyn ScriptEngine> = Box::new(Recorder(log.clone()));
  let mut p = ParserBuilder { script: Some(script), ..builder() }
    .build_str("script \"one\"\nscript \"fail\"\nscript \"two\"");
  assert_eq!(p.run().ok(), Some(false));
  assert_eq!(*log.borrow(), ["one", "two"]);
  let [e] = p.diagnostics() else { panic!("{:?}", p.diagnostics()) };
  assert_eq!((e.msg.to_string().as_str(), e.pos), ("script failed", Position::new(2, 7)));
}

#[test]
fn options() {
  let (p, out) = run_capture("axiom T : Type\nset_option verbose true\naxiom U : T\n\
    set_option verbose false\naxiom V : T\nset_option nope true");
  assert_eq!(out, ["U : T"]);
  let [e] = p.diagnostics() else { panic!("{:?}", p.diagnostics()) };
  assert_eq!(e.msg.to_string(), "unknown option 'nope'");

  let mut ios = IoState::sink();
  assert!(ios.options.contains(Options::SHOW_ERRORS | Options::COLOR));
  assert!(ios.set_option("show_errors", false));
  assert!(ios.set_option("color", false));
  assert!(!ios.set_option("SHOW_ERRORS", true));
  assert!(ios.options.is_empty());
  assert_eq!(Options::by_option_name("verbose"), Some(Options::VERBOSE));
}

#[test]
fn tactics() {
  let out = check_arith(&[
    "by exact a ; assumption",
    "by id | fail | assumption",
    "by exact a ; id | fail",
    "by id ; id ; id",
    "by repeat (intro x y ; apply f)",
    "by try exact f a",
  ]);
  assert_eq!(out, [
    "(by (then (exact a) assumption))",
    "(by (orelse id (orelse fail assumption)))",
    "(by (orelse (then (exact a) id) fail))",
    "(by (then (then id id) id))",
    "(by (repeat (then (intro x y) (apply f))))",
    "(by (try (exact (f a))))",
  ]);
}

#[test]
fn intro_binds_for_later_tactics() {
  let out = check_arith(&[
    "by intro x y ; exact add x y",
    "by intro x ; repeat (intro y ; apply f y) ; exact x",
  ]);
  assert_eq!(out, [
    "(by (then (intro x y) (exact (add x y))))",
    "(by (then (then (intro x) (repeat (then (intro y) (apply (f y))))) (exact x)))",
  ]);
  let (p, _) = run_capture("axiom P : Prop\ntheorem t : P → P := by intro h ; exact h\ncheck h\n");
  let [e] = p.diagnostics() else { panic!("{:?}", p.diagnostics()) };
  assert_eq!(e.kind, ErrorKind::NameResolution);
  assert_eq!(e.pos, Position::new(3, 6));
  assert!(p.env().get_decl(&Name::atom("t")).is_some());
}

#[test]
fn unknown_tactic() {
  let (p, _) = run_capture("check by frobnicate");
  let [e] = p.diagnostics() else { panic!("{:?}", p.diagnostics()) };
  assert_eq!(e.kind, ErrorKind::Syntax);
  assert_eq!(e.msg.to_string(), "unknown tactic 'frobnicate'");
}

#[test]
fn scanner_keywords_and_qualified_names() {
  let env = Environment::new();
  let mut s = Scanner::new(LinedString::from("funny fun Foo.bar :=: λx"));
  let mut toks = vec![];
  loop {
    let tk = s.scan(&env).expect("scan");
    if matches!(tk.kind, TokenKind::Eof) { break }
    toks.push((matches!(tk.kind, TokenKind::Keyword(_)), tk.kind.to_string()));
  }
  let expected = [
    (false, "'funny'"), (true, "'fun'"), (false, "'Foo.bar'"),
    (true, "':='"), (true, "':'"), (true, "'λ'"), (false, "'x'"),
  ];
  assert_eq!(toks, expected.map(|(k, s)| (k, s.to_owned())));
}

#[test]
fn longest_token_match() {
  let mut env = Environment::new();
  assert_eq!(env.longest_token(":= x").map(|t| &*t.text), Some(":="));
  assert_eq!(env.longest_token(": x").map(|t| &*t.text), Some(":"));
  env.add_token(":=>");
  assert_eq!(env.longest_token(":=>").map(|t| &*t.text), Some(":=>"));
  assert_eq!(env.longest_token(":=x").map(|t| &*t.text), Some(":="));
  assert!(env.longest_token("%").is_none());
}

#[test]
fn names() {
  let n = Name::from_dotted("a.b.c");
  assert_eq!(n.to_string(), "a.b.c");
  assert_eq!(n.prefix(), Name::from_dotted("a.b"));
  let ps: Vec<_> = Name::from_dotted("a.b").prefixes().map(|n| n.to_string()).collect();
  assert_eq!(ps, ["a.b", "a", "[anonymous]"]);
  assert_eq!(Name::atom("a").join(&Name::from_dotted("b.c")), n);
}

#[test]
fn resolution_prefers_innermost_namespace() {
  let (p, out) = run_capture("\
axiom T : Type
namespace N
axiom T : Type
check T
end N
check T
");
  assert!(p.diagnostics().is_empty(), "{:?}", p.diagnostics());
  assert_eq!(out, ["N.T", "T"]);
}

#[test]
fn notation_tables_from_the_host() {
  let mut env = Environment::new();
  for x in ["a", "b", "c", "add", "mul"] {
    let decl = Declaration { name: Name::atom(x), kind: DeclKind::Axiom, ty: Expr::hole(), value: None, pos: None };
    env.add_decl(decl).expect("fresh name");
  }
  env.add_infix("+", 65, 66, Name::atom("add"));
  env.add_infix("*", 70, 71, Name::atom("mul"));
  for (s, res) in [("a + b * c", "(add a (mul b c))"), ("a * b + c", "(add (mul a b) c)")] {
    let mut p = ParserBuilder { env: env.clone(), ..builder() }.build_str(s);
    assert_eq!(p.parse_expr(0).expect("parse").to_string(), res);
  }
}

#[test]
fn get_tag_is_stable() {
  let mut table = PosTable::default();
  let (e1, e2) = (Expr::hole(), Expr::hole());
  let t1 = table.get_tag(&e1);
  assert_eq!(table.get_tag(&e1), t1);
  assert_ne!(table.get_tag(&e2), t1);
  assert_eq!(table.pos_of(&e1), None);
  table.save_pos(&e2, Position::new(3, 4));
  assert_eq!(table.pos_of(&e2), Some(Position::new(3, 4)));
  assert_eq!(table.len(), 2);
}
