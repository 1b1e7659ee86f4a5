//! Child ordering for elements written from typed fields.

use super::{RawElement, XmlWriter};

/// Writes preserved extra children back at their schema position.
///
/// Elements such as `w:pPr` are decoded into typed fields plus a list of
/// children kept verbatim. When written back, each typed child is preceded
/// by the extras that sort before it in `order`; extras whose name is not
/// listed go last.
pub(crate) struct Interleave<'a> {
    order: &'static [&'static str],
    extras: Vec<(usize, &'a RawElement)>,
    next: usize,
}

impl<'a> Interleave<'a> {
    pub(crate) fn new(order: &'static [&'static str], extras: &'a [RawElement]) -> Self {
        let mut extras: Vec<_> = extras
            .iter()
            .map(|e| (rank(order, e.local_name()), e))
            .collect();
        extras.sort_by_key(|(rank, _)| *rank);
        Self {
            order,
            extras,
            next: 0,
        }
    }

    /// Write every pending extra that sorts before the child `local`.
    pub(crate) fn before(&mut self, writer: &mut XmlWriter, local: &str) {
        let limit = rank(self.order, local);
        while let Some((rank, element)) = self.extras.get(self.next) {
            if *rank >= limit {
                break;
            }
            writer.raw(element);
            self.next += 1;
        }
    }

    /// Write whatever is left.
    pub(crate) fn finish(mut self, writer: &mut XmlWriter) {
        for (_, element) in self.extras.drain(self.next..) {
            writer.raw(element);
        }
    }
}

fn rank(order: &[&str], local: &str) -> usize {
    order
        .iter()
        .position(|name| *name == local)
        .unwrap_or(order.len())
}
