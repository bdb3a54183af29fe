/// A piece of archive metadata with a known byte length and a serialized form.
pub trait SizedBinary {
    /// Length in bytes of the serialized form.
    fn size(&self) -> usize;

    /// Appends the serialized form to `buffer`.
    fn write_to(&self, buffer: &mut Vec<u8>);

    fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(self.size());
        self.write_to(&mut buffer);
        buffer
    }
}
