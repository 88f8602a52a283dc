/// The fixed IDX stock universe, with the principle-compliance flag per
/// ticker. Kept as static reference data; requests never mutate it.
const PRINCIPLE_COMPLIANCE: &[(&str, bool)] = &[
    ("BBCA.JK", false),
    ("BMRI.JK", true),
    ("TLKM.JK", false),
    ("ASII.JK", false),
    ("UNVR.JK", true),
    ("GOTO.JK", false),
    ("ARTO.JK", false),
    ("MDKA.JK", true),
    ("ICBP.JK", true),
    ("BBNI.JK", false),
    ("BRIS.JK", true),
    ("ANTM.JK", true),
    ("PGAS.JK", true),
    ("ADRO.JK", true),
    ("KLBF.JK", false),
    ("ACES.JK", true),
    ("INDF.JK", true),
    ("PTBA.JK", true),
    ("CPIN.JK", true),
    ("EXCL.JK", true),
];

pub fn tickers() -> Vec<&'static str> {
    PRINCIPLE_COMPLIANCE.iter().map(|(t, _)| *t).collect()
}

pub fn is_principle_compliant(ticker: &str) -> bool {
    PRINCIPLE_COMPLIANCE
        .iter()
        .find(|(t, _)| *t == ticker)
        .map(|(_, compliant)| *compliant)
        .unwrap_or(false)
}
