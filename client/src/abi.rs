//! Solidity interface of the srtk NFT contract.
#![allow(missing_docs, clippy::pub_underscore_fields)]

use alloy::sol;

sol!(
    #[sol(rpc)]
    #[derive(Debug)]
    contract SrtkNft {
        function tokenIds() external view returns (uint256);
        function owner() external view returns (address);
        function presaleStarted() external view returns (bool);
        function presaleEnded() external view returns (uint256);

        function startPresale() external;
        function presaleMint() external payable;
        function mint() external payable;
    }
);
