//! Counter contract bindings.

use alloy::sol;

// Counter interface
sol! {
    interface ICounter {
        function getCount() external view returns (uint256);
        function increment() external;
    }
}
