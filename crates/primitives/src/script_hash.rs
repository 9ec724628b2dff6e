//! Script hash derivation for native contracts and signature accounts.

use crate::error::{PrimitiveError, PrimitiveResult};
use crate::uint160::{UInt160, UINT160_SIZE};

const OP_PUSH0: u8 = 0x10;
const OP_PUSHDATA1: u8 = 0x0c;
const OP_SYSCALL: u8 = 0x41;
const OP_ABORT: u8 = 0x38;

/// Interop id of `System.Crypto.CheckSig` (first four bytes of its SHA-256).
const CHECK_SIG_SYSCALL: [u8; 4] = [0x56, 0xe7, 0xb3, 0x27];

/// Length of a compressed secp256r1 public key.
pub const PUBLIC_KEY_SIZE: usize = 33;

/// Computes the script hash of a native contract from its name.
///
/// Native contracts are deployed by the zero sender with a zero NEF checksum,
/// so the hash depends on the name only:
/// `hash160(ABORT ‖ PUSHDATA1 <zero sender> ‖ PUSH0 ‖ PUSHDATA1 <name>)`.
pub fn native_contract_hash(name: &str) -> UInt160 {
    let name = name.as_bytes();
    let mut script = Vec::with_capacity(4 + UINT160_SIZE + 2 + name.len());
    script.push(OP_ABORT);
    script.push(OP_PUSHDATA1);
    script.push(UINT160_SIZE as u8);
    script.extend_from_slice(&[0u8; UINT160_SIZE]);
    script.push(OP_PUSH0);
    script.push(OP_PUSHDATA1);
    // Native names are short ASCII identifiers.
    script.push(name.len() as u8);
    script.extend_from_slice(name);
    UInt160::from_script(&script)
}

/// Computes the account script hash of a single-signature verification script.
///
/// # Errors
///
/// Returns `PrimitiveError::InvalidFormat` if `public_key` is not a 33-byte
/// compressed key.
pub fn signature_account(public_key: &[u8]) -> PrimitiveResult<UInt160> {
    if public_key.len() != PUBLIC_KEY_SIZE || !matches!(public_key[0], 0x02 | 0x03) {
        return Err(PrimitiveError::invalid_format(format!(
            "expected a {PUBLIC_KEY_SIZE}-byte compressed public key"
        )));
    }
    let mut script = Vec::with_capacity(2 + PUBLIC_KEY_SIZE + 5);
    script.push(OP_PUSHDATA1);
    script.push(PUBLIC_KEY_SIZE as u8);
    script.extend_from_slice(public_key);
    script.push(OP_SYSCALL);
    script.extend_from_slice(&CHECK_SIG_SYSCALL);
    Ok(UInt160::from_script(&script))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sha2::{Digest, Sha256};

    #[test]
    fn native_hashes_match_mainnet() {
        assert_eq!(
            native_contract_hash("NeoToken").to_string(),
            "0xef4073a0f2b305a38ec4050e4d3d28bc40ea63f5"
        );
        assert_eq!(
            native_contract_hash("GasToken").to_string(),
            "0xd2a4cff31913016155e38e474a2c06d08be276cf"
        );
        assert_eq!(
            native_contract_hash("PolicyContract").to_string(),
            "0xcc5e4edd9f5f8dba8bb65734541df7a1c081c67b"
        );
    }

    #[test]
    fn check_sig_syscall_id() {
        let digest = Sha256::digest(b"System.Crypto.CheckSig");
        assert_eq!(&digest[..4], &CHECK_SIG_SYSCALL);
    }

    #[test]
    fn signature_account_hash() {
        let key =
            hex::decode("03b209fd4f53a7170ea4444e0cb0a6bb6a53c2bd016926989cf85f9b0fba17a70c")
                .unwrap();
        assert_eq!(
            signature_account(&key).unwrap().to_string(),
            "0x94611499d5b3f1501569ecae0ac6e782d49e9496"
        );
        assert!(signature_account(&key[1..]).is_err());
        let mut uncompressed = key.clone();
        uncompressed[0] = 0x04;
        assert!(signature_account(&uncompressed).is_err());
    }
}
