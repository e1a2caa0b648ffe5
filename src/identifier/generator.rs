/// 标识符生成
///
/// 两种策略：
/// - 随机：每个字段独立随机
/// - 哈希派生：由同一个随机种子经 MD5 / SHA-256 确定性派生
use rand::Rng;
use sha2::{Digest, Sha256};
use uuid::Uuid;
use super::IdentifierSet;

const HEX_CHARS: &[u8] = b"0123456789abcdef";

/// 生成指定长度的随机十六进制字符串
pub fn generate_hex_id(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| HEX_CHARS[rng.gen_range(0..HEX_CHARS.len())] as char)
        .collect()
}

/// 由种子派生设备 UUID
///
/// 取种子 MD5 摘要的十六进制形式，按 `xxxxxxxx-xxxx-3xxx-8xxx-xxxxxxxxxxxx` 排列，
/// 第 13 位固定为 `3`，第 17 位固定为 `8`。
pub fn generate_device_uuid(seed: &str) -> String {
    let hash = format!("{:x}", md5::compute(seed.as_bytes()));
    format!(
        "{}-{}-3{}-8{}-{}",
        &hash[0..8],
        &hash[8..12],
        &hash[13..16],
        &hash[17..20],
        &hash[20..32]
    )
}

/// machineId = SHA-256(seed)
pub fn generate_machine_id(seed: &str) -> String {
    sha256_hex(seed.as_bytes())
}

/// macMachineId = SHA-256(seed ‖ seed)
pub fn generate_mac_machine_id(seed: &str) -> String {
    let doubled = format!("{}{}", seed, seed);
    sha256_hex(doubled.as_bytes())
}

/// sqmId 为大写设备 ID 外加花括号
pub fn sqm_id_for(device_id: &str) -> String {
    format!("{{{}}}", device_id.to_uppercase())
}

fn sha256_hex(data: &[u8]) -> String {
    Sha256::digest(data)
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// 由种子派生完整标识符集合
pub fn derive_from_seed(seed: &str) -> IdentifierSet {
    let dev_device_id = generate_device_uuid(seed);
    IdentifierSet {
        mac_machine_id: generate_mac_machine_id(seed),
        machine_id: generate_machine_id(seed),
        sqm_id: sqm_id_for(&dev_device_id),
        dev_device_id,
    }
}

/// 哈希派生策略：一个随机种子派生所有字段
pub fn hash_derived() -> IdentifierSet {
    derive_from_seed(&generate_hex_id(64))
}

/// 随机策略：每个字段独立生成
pub fn random() -> IdentifierSet {
    IdentifierSet {
        mac_machine_id: generate_hex_id(128),
        machine_id: generate_hex_id(64),
        dev_device_id: Uuid::new_v4().to_string(),
        sqm_id: format!("{{{}}}", Uuid::new_v4().to_string().to_uppercase()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_lower_hex(s: &str) -> bool {
        s.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))
    }

    #[test]
    fn test_generate_hex_id() {
        let id = generate_hex_id(64);
        assert_eq!(id.len(), 64);
        assert!(is_lower_hex(&id));
        assert_ne!(id, generate_hex_id(64));
    }

    #[test]
    fn test_device_uuid_shape() {
        let uuid = generate_device_uuid("seed");
        let parts: Vec<&str> = uuid.split('-').collect();

        assert_eq!(parts.iter().map(|p| p.len()).collect::<Vec<_>>(), vec![8, 4, 4, 4, 12]);
        assert!(parts[2].starts_with('3'));
        assert!(parts[3].starts_with('8'));

        let hash = format!("{:x}", md5::compute(b"seed"));
        assert_eq!(parts[0], &hash[0..8]);
        assert_eq!(&parts[2][1..], &hash[13..16]);
        assert_eq!(parts[4], &hash[20..32]);
    }

    #[test]
    fn test_hash_functions_are_deterministic() {
        let seed = "0f0e0d0c";
        assert_eq!(generate_device_uuid(seed), generate_device_uuid(seed));
        assert_eq!(generate_machine_id(seed), generate_machine_id(seed));
        assert_eq!(generate_mac_machine_id(seed), generate_mac_machine_id(seed));
        assert_eq!(derive_from_seed(seed), derive_from_seed(seed));
    }

    #[test]
    fn test_known_sha256_values() {
        assert_eq!(
            generate_machine_id("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(generate_mac_machine_id("abc"), generate_machine_id("abcabc"));
    }

    #[test]
    fn test_sqm_id_wraps_uppercase_device_id() {
        let ids = derive_from_seed("seed");
        assert_eq!(ids.sqm_id, format!("{{{}}}", ids.dev_device_id.to_uppercase()));
    }

    #[test]
    fn test_random_strategy_shapes() {
        let ids = random();
        assert_eq!(ids.mac_machine_id.len(), 128);
        assert_eq!(ids.machine_id.len(), 64);
        assert!(Uuid::parse_str(&ids.dev_device_id).is_ok());
        assert!(ids.sqm_id.starts_with('{') && ids.sqm_id.ends_with('}'));
        assert_eq!(ids.sqm_id, ids.sqm_id.to_uppercase());
    }

    #[test]
    fn test_hash_derived_differs_between_runs() {
        assert_ne!(hash_derived(), hash_derived());
    }
}
