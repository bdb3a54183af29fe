/// List that stores zero or one element without allocating.
///
/// Path lookups almost always yield a single entry, so the common case stays
/// off the heap.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FrugalList<T> {
    #[default]
    Empty,
    One(T),
    Many(Vec<T>),
}

impl<T> FrugalList<T> {
    pub fn new() -> Self {
        Self::Empty
    }

    pub fn push(&mut self, item: T) {
        *self = match std::mem::take(self) {
            Self::Empty => Self::One(item),
            Self::One(first) => Self::Many(vec![first, item]),
            Self::Many(mut items) => {
                items.push(item);
                Self::Many(items)
            }
        };
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::One(_) => 1,
            Self::Many(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn first(&self) -> Option<&T> {
        self.as_slice().first()
    }

    pub fn last(&self) -> Option<&T> {
        self.as_slice().last()
    }

    pub fn as_slice(&self) -> &[T] {
        match self {
            Self::Empty => &[],
            Self::One(item) => std::slice::from_ref(item),
            Self::Many(items) => items,
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Empty => Vec::new(),
            Self::One(item) => vec![item],
            Self::Many(items) => items,
        }
    }
}

impl<T> FromIterator<T> for FrugalList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::Empty;
        for item in iter {
            list.push(item);
        }
        list
    }
}

impl<'a, T> IntoIterator for &'a FrugalList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> IntoIterator for FrugalList<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::FrugalList;

    #[test]
    fn grows_from_empty_to_many() {
        let mut list = FrugalList::new();
        assert!(list.is_empty());
        assert_eq!(list.first(), None);

        list.push(1);
        assert_eq!(list, FrugalList::One(1));

        list.push(2);
        list.push(3);
        assert_eq!(list.len(), 3);
        assert_eq!(list.first(), Some(&1));
        assert_eq!(list.last(), Some(&3));
        assert_eq!(list.into_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn collects_single_item_without_vec() {
        let list: FrugalList<u8> = std::iter::once(7).collect();
        assert!(matches!(list, FrugalList::One(7)));
    }
}
