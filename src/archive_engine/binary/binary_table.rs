use crate::archive_engine::binary::SizedBinary;
use std::sync::OnceLock;

/// Ordered table of binary records.
///
/// The aggregate size is the sum of the record sizes and the serialized form is the
/// concatenation of the record bytes in table order. Both are computed on first use
/// and cached; a table is never mutated after construction.
#[derive(Debug, Clone)]
pub struct BinaryTable<R> {
    records: Vec<R>,
    size: OnceLock<usize>,
    bytes: OnceLock<Vec<u8>>,
}

impl<R: SizedBinary> BinaryTable<R> {
    pub fn new(records: Vec<R>) -> Self {
        Self {
            records,
            size: OnceLock::new(),
            bytes: OnceLock::new(),
        }
    }

    #[inline]
    pub fn records(&self) -> &[R] {
        &self.records
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&R> {
        self.records.get(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    /// Serialized table, cached after the first call.
    pub fn bytes(&self) -> &[u8] {
        self.bytes.get_or_init(|| {
            let mut buffer = Vec::with_capacity(self.size());
            for record in &self.records {
                record.write_to(&mut buffer);
            }
            buffer
        })
    }
}

impl<R: SizedBinary> SizedBinary for BinaryTable<R> {
    fn size(&self) -> usize {
        *self.size.get_or_init(|| match self.records.as_slice() {
            [] => 0,
            [only] => only.size(),
            records => records.iter().map(SizedBinary::size).sum(),
        })
    }

    fn write_to(&self, buffer: &mut Vec<u8>) {
        buffer.extend_from_slice(self.bytes());
    }

    fn to_bytes(&self) -> Vec<u8> {
        self.bytes().to_vec()
    }
}

impl<R: PartialEq> PartialEq for BinaryTable<R> {
    fn eq(&self, other: &Self) -> bool {
        self.records == other.records
    }
}

impl<R: Eq> Eq for BinaryTable<R> {}

impl<R: SizedBinary> From<Vec<R>> for BinaryTable<R> {
    fn from(records: Vec<R>) -> Self {
        Self::new(records)
    }
}

impl<'a, R> IntoIterator for &'a BinaryTable<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
