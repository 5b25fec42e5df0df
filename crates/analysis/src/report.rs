//! Report address resolution.

/// Joins the base address and a backend-issued relative report path.
///
/// Plain concatenation: no request is made and nothing is validated, so the
/// same inputs always yield the same address.
///
/// ```
/// assert_eq!(
///     analysis::report_url("http://127.0.0.1:8000", "/reports/abc.pdf"),
///     "http://127.0.0.1:8000/reports/abc.pdf"
/// );
/// ```
pub fn report_url(base_address: &str, reference: &str) -> String {
    let mut url = String::with_capacity(base_address.len() + reference.len());
    url.push_str(base_address);
    url.push_str(reference);
    url
}
