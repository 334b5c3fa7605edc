//! Conversions from the byte ranges reported by the XML parser to the span
//! types expected by `miette` diagnostics.

use std::ops::Range;

pub trait ToMiette {
    type Target;

    fn to_miette(self) -> Self::Target;
}

impl ToMiette for usize {
    type Target = miette::SourceOffset;

    fn to_miette(self) -> Self::Target {
        self.into()
    }
}

impl ToMiette for Range<usize> {
    type Target = miette::SourceSpan;

    fn to_miette(self) -> Self::Target {
        let length = self.end.saturating_sub(self.start);
        miette::SourceSpan::new(self.start.to_miette(), length)
    }
}

impl<T: ToMiette> ToMiette for Option<T> {
    type Target = Option<T::Target>;

    fn to_miette(self) -> Self::Target {
        self.map(ToMiette::to_miette)
    }
}
