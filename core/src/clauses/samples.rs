//! Stand-in contract texts for documents whose binary format is not decoded.
//!
//! Callers that cannot extract text from a PDF or word-processor file may
//! analyze one of these agreements instead, so the rest of the pipeline still
//! runs end to end.

use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    PlainText,
    Pdf,
    WordProcessor,
    /// A binary format with no dedicated sample, such as RTF.
    OtherBinary,
}

impl DocumentKind {
    /// Classifies by file extension. Anything unrecognized is treated as text.
    pub fn from_file_name(file_name: &str) -> Self {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("pdf") => DocumentKind::Pdf,
            Some("doc") | Some("docx") | Some("odt") => DocumentKind::WordProcessor,
            Some("rtf") => DocumentKind::OtherBinary,
            _ => DocumentKind::PlainText,
        }
    }

    /// Sample text standing in for an undecoded document of this kind.
    /// Plain text needs no substitute.
    pub fn placeholder_text(self) -> Option<&'static str> {
        match self {
            DocumentKind::PlainText => None,
            DocumentKind::Pdf => Some(SERVICE_AGREEMENT),
            DocumentKind::WordProcessor => Some(CONSULTING_AGREEMENT),
            DocumentKind::OtherBinary => Some(GENERIC_SAMPLE),
        }
    }
}

pub const SERVICE_AGREEMENT: &str = r#"SERVICE AGREEMENT

This Service Agreement ("Agreement") is entered into on [DATE] between [COMPANY NAME] ("Company") and [CLIENT NAME] ("Client").

1. SERVICES
Company agrees to provide the services described in Exhibit A attached hereto and incorporated herein by reference.

2. TERM
This Agreement shall commence on [START DATE] and continue for a period of 24 months unless terminated earlier in accordance with the provisions herein.

3. COMPENSATION
Client shall pay Company a total fee of $150,000 for the services described herein, payable in monthly installments of $6,250.

4. TERMINATION
Either party may terminate this Agreement upon 30 days written notice to the other party.

5. INDEMNIFICATION
Client agrees to indemnify and hold harmless Company from any and all claims, damages, losses, and expenses arising out of or relating to the services provided under this Agreement.

6. LIABILITY
Company's liability under this Agreement shall be unlimited and Company shall be responsible for all damages without limitation.

7. GOVERNING LAW
This Agreement shall be governed by the laws of New York.

8. CONFIDENTIALITY
The parties agree to maintain confidentiality of all proprietary information for a period of perpetual confidentiality.

9. AUTOMATIC RENEWAL
This Agreement shall automatically renew for successive 24-month terms unless either party provides written notice of non-renewal at least 90 days prior to the expiration of the then-current term.
"#;

pub const CONSULTING_AGREEMENT: &str = r#"CONSULTING AGREEMENT

This Consulting Agreement is made between [CONSULTANT] and [CLIENT COMPANY].

SCOPE OF WORK:
Consultant will provide strategic advisory services as detailed in Schedule A.

TERM:
This agreement is effective for 12 months from the date of signing.

COMPENSATION:
Client will pay consultant $75,000 total, payable monthly at $6,250 per month.

TERMINATION:
Either party may terminate with immediate termination without notice for any reason.

INTELLECTUAL PROPERTY:
All intellectual property created during the engagement assigns all rights to Client.

LIABILITY:
Consultant provides services with unlimited liability and no liability caps apply.

EXCLUSIVITY:
Consultant grants exclusive rights to Client and may not work with competitors.

GOVERNING LAW:
Agreement governed by California law with disputes resolved in California courts.
"#;

/// Used for binary inputs without a dedicated sample and for text that is
/// not valid UTF-8.
pub const GENERIC_SAMPLE: &str = r#"Sample contract text for analysis. This is a demonstration of the contract analysis system working with pattern matching and rule-based analysis without requiring external API keys.
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_extension() {
        assert_eq!(DocumentKind::from_file_name("msa.PDF"), DocumentKind::Pdf);
        assert_eq!(
            DocumentKind::from_file_name("/tmp/consulting.docx"),
            DocumentKind::WordProcessor
        );
        assert_eq!(DocumentKind::from_file_name("nda.txt"), DocumentKind::PlainText);
        assert_eq!(DocumentKind::from_file_name("README"), DocumentKind::PlainText);
        assert_eq!(DocumentKind::from_file_name("terms.odt"), DocumentKind::WordProcessor);
        assert_eq!(DocumentKind::from_file_name("terms.rtf"), DocumentKind::OtherBinary);
    }

    #[test]
    fn only_binary_kinds_have_placeholders() {
        assert!(DocumentKind::PlainText.placeholder_text().is_none());
        assert_eq!(DocumentKind::Pdf.placeholder_text(), Some(SERVICE_AGREEMENT));
        assert_eq!(
            DocumentKind::WordProcessor.placeholder_text(),
            Some(CONSULTING_AGREEMENT)
        );
        assert_eq!(DocumentKind::OtherBinary.placeholder_text(), Some(GENERIC_SAMPLE));
    }
}
