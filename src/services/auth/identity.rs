/*
 * Responsibility
 * - 検証済みトークンから復元される「リクエスト単位の主体」(Identity)
 * - gate が request extensions に入れ、handler は extractor 経由でのみ受け取る
 */
/// The caller resolved from a verified token.
///
/// `role` is carried verbatim from the token; normalization happened at issuance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
    pub role: String,
}

impl Identity {
    pub fn new(subject: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            role: role.into(),
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.role == role
    }
}
