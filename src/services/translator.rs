/// Stand-in for the real translation backend. The interesting engineering
/// lives in payment verification; this just tags the text.
pub fn translate(text: &str) -> String {
    format!("Terjemahan: {text} (Translated via x402)")
}
