use tracing::trace;

use crate::{
    declarator::{self, DeclaratorErr},
    entropy::Entropy,
    generate::generate,
    settings::GenerateOpts,
};

/// Generates a random type and returns `typedef <declaration>;` declaring it as `name`.
///
/// The name is checked before anything is generated, so a bad name doesn't consume any draws.
pub fn typedef<E: Entropy + ?Sized>(
    opts: &GenerateOpts,
    entropy: &mut E,
    name: &str,
) -> Result<String, DeclaratorErr> {
    declarator::validate_name(name)?;

    let ty = generate(opts, entropy);
    let line = declarator::typedef(&ty, name)?;
    trace!(%line, "rendered typedef");
    Ok(line)
}
