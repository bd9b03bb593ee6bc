//! FlightSuretyApp contract bindings.

alloy::sol! {
    #[sol(rpc)]
    #[derive(Debug)]
    contract FlightSuretyApp {
        /// Emitted when the contract solicits flight-status responses from
        /// the oracles holding `index`.
        event OracleRequest(uint8 index, address airline, string flight, uint256 timestamp);

        /// Registers the sender as an oracle; payable with the registration fee.
        function registerOracle() external payable;

        /// Whether the sender is already registered as an oracle.
        function isOracleAlreadyRegistered() external view returns (bool);

        /// The three indices assigned to the sender at registration.
        function getMyIndexes() external view returns (uint8[3] memory);

        /// Whether the request filed under `(airline, flight, timestamp, index)`
        /// is still accepting responses.
        function isOracleRequestOpenForIndex(
            address airline,
            string flight,
            uint256 timestamp,
            uint8 index
        ) external view returns (bool);

        /// Submits the sender's status code for the given request.
        function submitOracleResponse(
            uint8 index,
            address airline,
            string flight,
            uint256 timestamp,
            uint8 statusCode
        ) external;
    }
}
