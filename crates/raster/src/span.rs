use alloc::vec::Vec;

/// Maximum number of spans handed to a [`SpanSink`] in a single call.
pub const MAX_SPAN_BATCH: usize = 64;

/// Coverage of the pixels of a span.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Coverage<'l> {
    /// All pixels of the span have this alpha value.
    Opaque(u8),
    /// One alpha value per pixel.
    Mask(&'l [u8]),
}

/// A horizontal run of covered pixels.
///
/// Spans of a row are produced left to right and never overlap. Pixels that are not
/// part of any span have no coverage.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Span<'l> {
    pub row: u32,
    pub x: u32,
    pub len: u32,
    pub coverage: Coverage<'l>,
}

impl<'l> Span<'l> {
    /// Alpha value of the pixel at column `x`, zero outside of the span.
    pub fn alpha_at(&self, x: u32) -> u8 {
        if x < self.x || x >= self.x + self.len {
            return 0;
        }

        match self.coverage {
            Coverage::Opaque(alpha) => alpha,
            Coverage::Mask(mask) => mask[(x - self.x) as usize],
        }
    }

    pub fn to_owned_span(&self) -> OwnedSpan {
        OwnedSpan {
            row: self.row,
            x: self.x,
            len: self.len,
            coverage: match self.coverage {
                Coverage::Opaque(alpha) => OwnedCoverage::Opaque(alpha),
                Coverage::Mask(mask) => OwnedCoverage::Mask(mask.to_vec()),
            },
        }
    }
}

/// Owned version of [`Coverage`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum OwnedCoverage {
    Opaque(u8),
    Mask(Vec<u8>),
}

/// Owned version of [`Span`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct OwnedSpan {
    pub row: u32,
    pub x: u32,
    pub len: u32,
    pub coverage: OwnedCoverage,
}

impl OwnedSpan {
    pub fn as_span(&self) -> Span {
        Span {
            row: self.row,
            x: self.x,
            len: self.len,
            coverage: match &self.coverage {
                OwnedCoverage::Opaque(alpha) => Coverage::Opaque(*alpha),
                OwnedCoverage::Mask(mask) => Coverage::Mask(mask),
            },
        }
    }
}

/// Receives the spans produced by the rasterizer, top to bottom.
///
/// Implemented for closures taking a slice of spans.
pub trait SpanSink {
    fn spans(&mut self, spans: &[Span]);
}

impl<F> SpanSink for F
where
    F: FnMut(&[Span]),
{
    fn spans(&mut self, spans: &[Span]) {
        self(spans)
    }
}

/// A span sink that keeps a copy of every span.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpanBuffer {
    pub spans: Vec<OwnedSpan>,
}

impl SpanBuffer {
    pub fn new() -> Self {
        SpanBuffer::default()
    }

    pub fn clear(&mut self) {
        self.spans.clear();
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Span> + '_ {
        self.spans.iter().map(OwnedSpan::as_span)
    }

    /// Alpha value of a pixel, zero if no span covers it.
    pub fn coverage_at(&self, x: u32, row: u32) -> u8 {
        self.iter()
            .filter(|span| span.row == row)
            .map(|span| span.alpha_at(x))
            .find(|&alpha| alpha != 0)
            .unwrap_or(0)
    }

    /// Sum of the alpha values of all covered pixels.
    pub fn total_coverage(&self) -> u64 {
        let mut total = 0;
        for span in self.iter() {
            match span.coverage {
                Coverage::Opaque(alpha) => total += alpha as u64 * span.len as u64,
                Coverage::Mask(mask) => total += mask.iter().map(|&a| a as u64).sum::<u64>(),
            }
        }

        total
    }
}

impl SpanSink for SpanBuffer {
    fn spans(&mut self, spans: &[Span]) {
        self.spans.extend(spans.iter().map(Span::to_owned_span));
    }
}

#[test]
fn span_alpha() {
    let mask = [10u8, 20, 30];
    let span = Span {
        row: 0,
        x: 4,
        len: 3,
        coverage: Coverage::Mask(&mask),
    };
    assert_eq!(span.alpha_at(3), 0);
    assert_eq!(span.alpha_at(5), 20);
    assert_eq!(span.alpha_at(7), 0);

    let mut buffer = SpanBuffer::new();
    buffer.spans(&[
        span,
        Span {
            row: 1,
            x: 0,
            len: 2,
            coverage: Coverage::Opaque(255),
        },
    ]);
    assert_eq!(buffer.len(), 2);
    assert_eq!(buffer.coverage_at(6, 0), 30);
    assert_eq!(buffer.coverage_at(1, 1), 255);
    assert_eq!(buffer.total_coverage(), 60 + 510);
    assert_eq!(buffer.spans[0].as_span(), span);
}
