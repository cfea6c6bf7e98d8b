use serde::Serialize;

/// Static description of an EVM-compatible network.
///
/// `chain_id` is `None` for networks whose id is not pinned here; the wallet
/// adopts whatever the live endpoint reports for those.
#[derive(Debug, Clone, Serialize)]
pub struct EvmChain {
    pub identifier: &'static str,
    pub chain_id: Option<u64>,
    pub symbol: &'static str,
    pub rpc_url: &'static str,
    pub explorer_url: Option<&'static str>,
}

/// Arbitrum Goerli (chain ID 421613).
pub const ARBITRUM_GOERLI: EvmChain = EvmChain {
    identifier: "Arbitrum Goerli",
    chain_id: Some(421613),
    symbol: "ETH",
    rpc_url: "https://arbitrum-goerli-rpc.publicnode.com",
    explorer_url: Some("https://goerli.arbiscan.io"),
};

/// Arbitrum Sepolia (chain ID 421614).
pub const ARBITRUM_SEPOLIA: EvmChain = EvmChain {
    identifier: "Arbitrum Sepolia",
    chain_id: Some(421614),
    symbol: "ETH",
    rpc_url: "https://arbitrum-sepolia-rpc.publicnode.com",
    explorer_url: Some("https://sepolia.arbiscan.io"),
};

/// Arbitrum (chain ID 42161).
pub const ARBITRUM: EvmChain = EvmChain {
    identifier: "Arbitrum",
    chain_id: Some(42161),
    symbol: "ETH",
    rpc_url: "https://arbitrum-one-rpc.publicnode.com",
    explorer_url: Some("https://arbiscan.io"),
};

/// Avalanche (chain ID 43114).
pub const AVALANCHE: EvmChain = EvmChain {
    identifier: "Avalanche",
    chain_id: Some(43114),
    symbol: "AVAX",
    rpc_url: "https://avalanche-c-chain-rpc.publicnode.com",
    explorer_url: Some("https://snowtrace.io"),
};

/// Base (chain ID 8453).
pub const BASE: EvmChain = EvmChain {
    identifier: "Base",
    chain_id: Some(8453),
    symbol: "ETH",
    rpc_url: "https://base-rpc.publicnode.com",
    explorer_url: Some("https://basescan.org"),
};

/// Base Goerli (chain ID 84531).
pub const BASE_GOERLI: EvmChain = EvmChain {
    identifier: "Base Goerli",
    chain_id: Some(84531),
    symbol: "ETH",
    rpc_url: "https://base-goerli.public.blastapi.io",
    explorer_url: Some("https://goerli.basescan.org"),
};

/// Base Sepolia (chain ID 84532).
pub const BASE_SEPOLIA: EvmChain = EvmChain {
    identifier: "Base Sepolia",
    chain_id: Some(84532),
    symbol: "ETH",
    rpc_url: "https://base-sepolia-rpc.publicnode.com",
    explorer_url: Some("https://sepolia.basescan.org"),
};

/// BSC (chain ID 56).
pub const BSC: EvmChain = EvmChain {
    identifier: "BSC",
    chain_id: Some(56),
    symbol: "BNB",
    rpc_url: "https://bsc-rpc.publicnode.com",
    explorer_url: Some("https://bscscan.com"),
};

/// BSC Testnet (chain ID 97).
pub const BSC_TESTNET: EvmChain = EvmChain {
    identifier: "BSC Testnet",
    chain_id: Some(97),
    symbol: "BNB",
    rpc_url: "https://bsc-testnet-rpc.publicnode.com",
    explorer_url: Some("https://testnet.bscscan.com"),
};

/// Ethereum (chain ID 1).
pub const ETHEREUM: EvmChain = EvmChain {
    identifier: "Ethereum",
    chain_id: Some(1),
    symbol: "ETH",
    rpc_url: "https://ethereum-rpc.publicnode.com",
    explorer_url: Some("https://etherscan.io"),
};

/// Fantom (chain ID 250).
pub const FANTOM: EvmChain = EvmChain {
    identifier: "Fantom",
    chain_id: Some(250),
    symbol: "FTM",
    rpc_url: "https://fantom-rpc.publicnode.com",
    explorer_url: Some("https://ftmscan.com"),
};

/// Fantom Testnet (chain ID 4002).
pub const FANTOM_TESTNET: EvmChain = EvmChain {
    identifier: "Fantom Testnet",
    chain_id: Some(4002),
    symbol: "FTM",
    rpc_url: "https://fantom-testnet-rpc.publicnode.com",
    explorer_url: Some("https://testnet.ftmscan.com"),
};

/// Fuji (chain ID 43113).
pub const FUJI: EvmChain = EvmChain {
    identifier: "Fuji",
    chain_id: Some(43113),
    symbol: "AVAX",
    rpc_url: "https://avalanche-fuji-c-chain-rpc.publicnode.com",
    explorer_url: Some("https://testnet.snowtrace.io"),
};

/// Goerli (chain ID 5).
pub const GOERLI: EvmChain = EvmChain {
    identifier: "Goerli",
    chain_id: Some(5),
    symbol: "ETH",
    rpc_url: "https://goerli.gateway.tenderly.co",
    explorer_url: Some("https://goerli.etherscan.io"),
};

/// Linea (chain ID 59144).
pub const LINEA: EvmChain = EvmChain {
    identifier: "Linea",
    chain_id: Some(59144),
    symbol: "ETH",
    rpc_url: "https://linea.drpc.org",
    explorer_url: Some("https://lineascan.build"),
};

/// Linea Goerli (chain ID 59140).
pub const LINEA_GOERLI: EvmChain = EvmChain {
    identifier: "Linea Goerli",
    chain_id: Some(59140),
    symbol: "ETH",
    rpc_url: "https://linea-goerli.drpc.org",
    explorer_url: Some("https://goerli.lineascan.build"),
};

/// Mumbai (chain ID 80001).
pub const MUMBAI: EvmChain = EvmChain {
    identifier: "Mumbai",
    chain_id: Some(80001),
    symbol: "MATIC",
    rpc_url: "https://polygon-mumbai-bor-rpc.publicnode.com",
    explorer_url: Some("https://mumbai.polygonscan.com"),
};

/// opBNB. The chain ID is taken from the endpoint.
pub const OPBNB: EvmChain = EvmChain {
    identifier: "opBNB",
    chain_id: None,
    symbol: "BNB",
    rpc_url: "https://opbnb-rpc.publicnode.com",
    explorer_url: Some("https://opbnb.bscscan.com"),
};

/// opBNB Testnet. The chain ID is taken from the endpoint.
pub const OPBNB_TESTNET: EvmChain = EvmChain {
    identifier: "opBNB Testnet",
    chain_id: None,
    symbol: "BNB",
    rpc_url: "https://opbnb-testnet-rpc.publicnode.com",
    explorer_url: Some("https://opbnb-testnet.bscscan.com"),
};

/// Optimism (chain ID 10).
pub const OPTIMISM: EvmChain = EvmChain {
    identifier: "Optimism",
    chain_id: Some(10),
    symbol: "ETH",
    rpc_url: "https://optimism-rpc.publicnode.com",
    explorer_url: Some("https://optimistic.etherscan.io"),
};

/// Optimism Sepolia. The chain ID is taken from the endpoint.
pub const OPTIMISM_SEPOLIA: EvmChain = EvmChain {
    identifier: "Optimism Sepolia",
    chain_id: None,
    symbol: "ETH",
    rpc_url: "https://optimism-sepolia-rpc.publicnode.com",
    explorer_url: Some("https://sepolia-optimism.etherscan.io"),
};

/// Optimism Goerli (chain ID 420).
pub const OPTIMISM_GOERLI: EvmChain = EvmChain {
    identifier: "Optimism Goerli",
    chain_id: Some(420),
    symbol: "ETH",
    rpc_url: "https://optimism-testnet.drpc.org",
    explorer_url: Some("https://goerli-optimism.etherscan.io"),
};

/// Polygon (chain ID 137).
pub const POLYGON: EvmChain = EvmChain {
    identifier: "Polygon",
    chain_id: Some(137),
    symbol: "MATIC",
    rpc_url: "https://polygon-bor-rpc.publicnode.com",
    explorer_url: Some("https://polygonscan.com"),
};

/// Sepolia (chain ID 11155111).
pub const SEPOLIA: EvmChain = EvmChain {
    identifier: "Sepolia",
    chain_id: Some(11155111),
    symbol: "ETH",
    rpc_url: "https://ethereum-sepolia-rpc.publicnode.com",
    explorer_url: Some("https://sepolia.etherscan.io"),
};

/// Scroll. The chain ID is taken from the endpoint.
pub const SCROLL: EvmChain = EvmChain {
    identifier: "Scroll",
    chain_id: None,
    symbol: "ETH",
    rpc_url: "https://scroll.drpc.org",
    explorer_url: Some("https://scrollscan.com"),
};

/// zkSync (chain ID 324).
pub const ZKSYNC: EvmChain = EvmChain {
    identifier: "zkSync",
    chain_id: Some(324),
    symbol: "ETH",
    rpc_url: "https://zksync.drpc.org",
    explorer_url: Some("https://explorer.zksync.io"),
};

/// All built-in EVM networks.
const ALL_CHAINS: &[&EvmChain] = &[
    &ARBITRUM_GOERLI,
    &ARBITRUM_SEPOLIA,
    &ARBITRUM,
    &AVALANCHE,
    &BASE,
    &BASE_GOERLI,
    &BASE_SEPOLIA,
    &BSC,
    &BSC_TESTNET,
    &ETHEREUM,
    &FANTOM,
    &FANTOM_TESTNET,
    &FUJI,
    &GOERLI,
    &LINEA,
    &LINEA_GOERLI,
    &MUMBAI,
    &OPBNB,
    &OPBNB_TESTNET,
    &OPTIMISM,
    &OPTIMISM_SEPOLIA,
    &OPTIMISM_GOERLI,
    &POLYGON,
    &SEPOLIA,
    &SCROLL,
    &ZKSYNC,
];

/// Returns all built-in network definitions.
pub fn supported_chains() -> Vec<&'static EvmChain> {
    ALL_CHAINS.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn chain(identifier: &str) -> &'static EvmChain {
        supported_chains()
            .into_iter()
            .find(|c| c.identifier == identifier)
            .unwrap()
    }

    #[test]
    fn bsc_entry() {
        let chain = chain("BSC");
        assert_eq!(chain.chain_id, Some(56));
        assert_eq!(chain.symbol, "BNB");
        assert_eq!(chain.explorer_url, Some("https://bscscan.com"));
    }

    #[test]
    fn ethereum_entry() {
        let chain = chain("Ethereum");
        assert_eq!(chain.chain_id, Some(1));
        assert_eq!(chain.symbol, "ETH");
    }

    #[test]
    fn unpinned_chains_have_no_id() {
        for identifier in ["opBNB", "opBNB Testnet", "Optimism Sepolia", "Scroll"] {
            assert!(
                chain(identifier).chain_id.is_none(),
                "{identifier} should be unpinned"
            );
        }
    }

    #[test]
    fn table_has_every_network() {
        assert_eq!(supported_chains().len(), 26);
    }

    #[test]
    fn identifiers_are_unique() {
        let chains = supported_chains();
        let ids: HashSet<_> = chains.iter().map(|c| c.identifier).collect();
        assert_eq!(ids.len(), chains.len());
    }

    #[test]
    fn pinned_chain_ids_are_unique() {
        let pinned: Vec<_> = supported_chains().iter().filter_map(|c| c.chain_id).collect();
        let unique: HashSet<_> = pinned.iter().collect();
        assert_eq!(unique.len(), pinned.len());
    }

    #[test]
    fn all_chains_have_https_endpoints() {
        for chain in supported_chains() {
            assert!(
                chain.rpc_url.starts_with("https://"),
                "{} rpc_url should start with https://",
                chain.identifier
            );
        }
    }

    #[test]
    fn explorer_urls_have_no_trailing_slash() {
        for chain in supported_chains() {
            if let Some(url) = chain.explorer_url {
                assert!(!url.ends_with('/'), "{} explorer has a trailing slash", chain.identifier);
            }
        }
    }
}
