use alloy::sol;

sol! {
    /// Collection contract driven by mintctl.
    ///
    /// Tiers and sale phases are both addressed by a `uint8` feature id.
    /// Tier mints are payable with `cost * quantity`.
    #[sol(rpc)]
    contract AvatarCollection {
        constructor(string name, string symbol, string hiddenMetadataUri);

        function feature(uint8 id)
            external
            view
            returns (uint256 cost, uint256 supply, bool isOpen, bytes32 merkleRoot);
        function toggleMint(uint8 id, bool open) external;
        function setMerkleRoot(uint8 id, bytes32 root) external;
        function claimed(uint8 id, address account) external view returns (uint256);

        function mintLegendary(uint256 quantity, bytes32[] calldata proof) external payable;
        function mintEpic(uint256 quantity, bytes32[] calldata proof) external payable;
        function mintRare(uint256 quantity) external payable;

        function getTeamAddress() external view returns (address);
        function setTeamAddress(address team) external;
        function setBaseURI(string memory uri) external;
    }
}
