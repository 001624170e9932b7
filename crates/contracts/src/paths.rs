//! Files recording where contracts got deployed to.

use {
    alloy::primitives::Address,
    std::{
        fs,
        io,
        path::{Path, PathBuf},
    },
};

/// Path to the file containing the address of the deployed contract `name`.
pub fn contract_address_file(dir: &Path, name: &str) -> PathBuf {
    // Fully qualified names contain path separators.
    let name = name.rsplit(':').next().unwrap_or(name);
    dir.join(format!("{name}.addr"))
}

/// Writes the checksummed address to `path`, creating missing parent
/// directories.
pub fn write_address(path: &Path, address: Address) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, format!("{}\n", address.to_checksum(None)))
}

#[cfg(test)]
mod tests {
    use {super::*, alloy::primitives::address, tempfile::TempDir};

    #[test]
    fn address_file_uses_contract_name() {
        let dir = Path::new("target/deploy");
        assert_eq!(
            contract_address_file(dir, "RT_ERC721"),
            dir.join("RT_ERC721.addr")
        );
        assert_eq!(
            contract_address_file(dir, "contracts/RT_ERC721.sol:RT_ERC721"),
            dir.join("RT_ERC721.addr")
        );
    }

    #[test]
    fn writes_checksummed_address() {
        let dir = TempDir::new().unwrap();
        let path = contract_address_file(&dir.path().join("deploy"), "RT_ERC721");

        write_address(
            &path,
            address!("0x5fbdb2315678afecb367f032d93f642f64180aa3"),
        )
        .unwrap();

        assert_eq!(
            fs::read_to_string(path).unwrap(),
            "0x5FbDB2315678afecb367f032d93F642f64180aa3\n"
        );
    }
}
