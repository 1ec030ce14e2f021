/// A sink for byte content, such as a running digest or MAC.
pub trait ByteVisitor {
    fn visit_bytes(&mut self, bytes: impl AsRef<[u8]>);
}

impl<'a, BV: ?Sized + ByteVisitor> ByteVisitor for &'a mut BV {
    fn visit_bytes(&mut self, bytes: impl AsRef<[u8]>) {
        (self as &mut BV).visit_bytes(bytes)
    }
}

impl ByteVisitor for Vec<u8> {
    fn visit_bytes(&mut self, bytes: impl AsRef<[u8]>) {
        self.extend_from_slice(bytes.as_ref())
    }
}

/// Content that can be streamed into a digest or keyed hash.
pub trait VisitBytes {
    fn visit<BV: ?Sized + ByteVisitor>(&self, visitor: &mut BV);
}

impl<'a, VB: ?Sized + VisitBytes> VisitBytes for &'a VB {
    fn visit<BV: ?Sized + ByteVisitor>(&self, visitor: &mut BV) {
        (self as &VB).visit(visitor)
    }
}

impl VisitBytes for [u8] {
    fn visit<BV: ?Sized + ByteVisitor>(&self, visitor: &mut BV) {
        visitor.visit_bytes(self);
    }
}

impl<const N: usize> VisitBytes for [u8; N] {
    fn visit<BV: ?Sized + ByteVisitor>(&self, visitor: &mut BV) {
        visitor.visit_bytes(self.as_slice())
    }
}

impl VisitBytes for Vec<u8> {
    fn visit<BV: ?Sized + ByteVisitor>(&self, visitor: &mut BV) {
        visitor.visit_bytes(self.as_slice());
    }
}

impl<T1, T2> VisitBytes for (T1, T2)
where
    T1: VisitBytes,
    T2: VisitBytes,
{
    fn visit<BV: ?Sized + ByteVisitor>(&self, visitor: &mut BV) {
        self.0.visit(visitor);
        self.1.visit(visitor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tuple_visits_in_order() {
        let mut out = Vec::new();
        ([1u8], ([2u8, 3u8], b"ab".as_slice())).visit(&mut out);
        assert_eq!(out, vec![1, 2, 3, b'a', b'b']);
    }
}
