/// Flat-file support for writing delimited text files.
///
/// The writer produces one header line followed by one line per record,
/// fields joined with a configurable single-byte delimiter. The layout is
/// declared once per record type through the [`FieldSet`] trait: an explicit,
/// statically ordered table of (column name, accessor) pairs. The same table
/// drives the header and every data line, so the two cannot drift apart.
///
/// Field values containing the delimiter, a double quote or a line break are
/// double-quoted on output, RFC 4180 style; everything else is written
/// verbatim.
pub mod flat_file_writer;

/// Ordered field layout of a flat-file record.
pub trait FieldSet {
    /// The (column name, accessor) pairs, in output order.
    fn fields() -> &'static [(&'static str, fn(&Self) -> &str)];
}
