use num_format::{Buffer, CustomFormat};
use piggy_jar_model::{jar::JarView, TokenAmount};

pub(crate) fn total_deposited(jars: &[JarView]) -> TokenAmount {
    jars.iter().map(|jar| jar.deposited_amount.0).sum()
}

/// `1234567` -> `1 234 567`
pub(crate) fn format_amount(amount: TokenAmount) -> String {
    let format = match CustomFormat::builder().separator(" ").build() {
        Ok(format) => format,
        Err(_) => return amount.to_string(),
    };

    let mut buf = Buffer::new();
    buf.write_formatted(&amount, &format);

    buf.to_string()
}
