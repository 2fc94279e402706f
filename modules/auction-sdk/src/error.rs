use anchor_lang::prelude::{error_code, Error};

#[error_code]
pub enum AuctionSdkError {
    /// No account exists at the address. Usually means "not created yet".
    #[msg("AccountNotFound")]
    AccountNotFound = 0x100,

    /// The account is not owned by the auction program. Wrong address or wrong cluster.
    #[msg("InvalidOwner")]
    InvalidOwner = 0x101,

    /// The account size does not fit the expected account kind.
    #[msg("InvalidAccountData")]
    InvalidAccountData = 0x102,

    #[msg("DeserializationError")]
    DeserializationError = 0x103,

    /// No bump seed yields an off-curve address.
    #[msg("AddressDerivationExhausted")]
    AddressDerivationExhausted = 0x200,

    /// A seed is longer than 32 bytes or there are too many seeds.
    #[msg("InvalidSeed")]
    InvalidSeed = 0x201,
}

impl AuctionSdkError {
    /// Whether `err` was raised as this error code.
    pub fn matches(self, err: &Error) -> bool {
        match err {
            Error::AnchorError(inner) => inner.error_code_number == u32::from(self),
            _ => false,
        }
    }
}
