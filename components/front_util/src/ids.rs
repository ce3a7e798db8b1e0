//! Strongly typed indices.

/// Declares a newtyped `u32` index `$id` together with a vector type `$vec`
/// that can only be indexed by `$id`.
#[macro_export]
macro_rules! id_wrapper {
  ($id:ident, $vec:ident) => {
    $crate::id_wrapper!($id, $vec,
      concat!("An index into a [`", stringify!($vec), "`]"));
  };
  ($id:ident, $vec:ident, $svec:expr) => {
    #[doc=$svec]
    #[derive(Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Default)]
    pub struct $id(pub u32);

    impl std::fmt::Debug for $id {
      fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.0, f)
      }
    }

    /// A vector wrapper with a strongly typed index interface.
    #[derive(Clone, Debug)]
    pub struct $vec<T>(pub Vec<T>);

    #[allow(dead_code)]
    impl<T> $vec<T> {
      /// Get a reference to the element at the given index.
      #[must_use]
      pub fn get(&self, i: $id) -> Option<&T> { self.0.get($crate::u32_as_usize(i.0)) }

      /// The index that the next pushed element will receive.
      #[must_use]
      pub fn next_id(&self) -> $id {
        $id(u32::try_from(self.0.len()).expect("index overflow"))
      }

      /// Push an element, returning its index.
      pub fn push(&mut self, t: T) -> $id {
        let id = self.next_id();
        self.0.push(t);
        id
      }
    }

    impl<T> Default for $vec<T> {
      fn default() -> $vec<T> { $vec(Vec::new()) }
    }

    impl<T> std::ops::Index<$id> for $vec<T> {
      type Output = T;
      fn index(&self, i: $id) -> &T { &self.0[$crate::u32_as_usize(i.0)] }
    }

    impl<T> std::ops::IndexMut<$id> for $vec<T> {
      fn index_mut(&mut self, i: $id) -> &mut T { &mut self.0[$crate::u32_as_usize(i.0)] }
    }

    impl<T> std::ops::Deref for $vec<T> {
      type Target = Vec<T>;
      fn deref(&self) -> &Vec<T> { &self.0 }
    }

    impl<T> FromIterator<T> for $vec<T> {
      fn from_iter<I: IntoIterator<Item=T>>(iter: I) -> Self { $vec(Vec::from_iter(iter)) }
    }
  };
}

id_wrapper!(Tag, TagVec);

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn typed_indexing() {
    let mut v = TagVec::default();
    let a = v.push("a");
    let b = v.push("b");
    assert_eq!((a, b), (Tag(0), Tag(1)));
    v[b] = "c";
    assert_eq!(v[b], "c");
    assert_eq!(v.get(Tag(2)), None);
    assert_eq!(v.next_id(), Tag(2));
  }
}
