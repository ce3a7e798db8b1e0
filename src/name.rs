//! Hierarchical names, such as `Foo.Bar.baz`.

use std::fmt;
use std::rc::Rc;
use itertools::Itertools;

/// A hierarchical name: a sequence of string components, printed separated by `.`.
///
/// The empty sequence is the anonymous name, which doubles as the root namespace prefix.
/// Names are reference counted, so cloning is cheap.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(Rc<[Rc<str>]>);

impl Name {
  /// The anonymous name.
  #[must_use] pub fn anonymous() -> Name { Name::default() }

  /// Construct a single-component name.
  #[must_use] pub fn atom(s: &str) -> Name { Name(Rc::from([Rc::from(s)])) }

  /// Parse a dotted string such as `"a.b.c"` into a name.
  /// Empty components are dropped, so `""` is the anonymous name.
  #[must_use] pub fn from_dotted(s: &str) -> Name {
    Name(s.split('.').filter(|c| !c.is_empty()).map(Rc::from).collect())
  }

  /// Returns true if this is the anonymous name.
  #[must_use] pub fn is_anonymous(&self) -> bool { self.0.is_empty() }

  /// Returns true if this name has exactly one component.
  #[must_use] pub fn is_atomic(&self) -> bool { self.0.len() == 1 }

  /// The components of the name, outermost first.
  #[must_use] pub fn components(&self) -> &[Rc<str>] { &self.0 }

  /// The last component of the name, if any.
  #[must_use] pub fn last(&self) -> Option<&str> { self.0.last().map(|s| &**s) }

  /// The name without its last component.
  #[must_use] pub fn prefix(&self) -> Name {
    match self.0.split_last() {
      None => Name::anonymous(),
      Some((_, init)) => Name(init.into()),
    }
  }

  /// `self ++ other`, the name obtained by qualifying `other` with `self`.
  #[must_use] pub fn join(&self, other: &Name) -> Name {
    if self.is_anonymous() { return other.clone() }
    if other.is_anonymous() { return self.clone() }
    Name(self.0.iter().chain(other.0.iter()).cloned().collect())
  }

  /// Iterate over all prefixes of this name, longest first, ending with the anonymous name.
  pub fn prefixes(&self) -> impl Iterator<Item=Name> + '_ {
    (0..=self.0.len()).rev().map(move |n| Name(self.0[..n].into()))
  }
}

impl fmt::Display for Name {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.is_anonymous() { return write!(f, "[anonymous]") }
    write!(f, "{}", self.0.iter().format("."))
  }
}

impl fmt::Debug for Name {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "`{}", self) }
}

impl From<&str> for Name {
  fn from(s: &str) -> Name { Name::from_dotted(s) }
}
