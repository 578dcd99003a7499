//! Deterministic test vectors.
//!
//! All values are canonical field elements encoded as the hex of their
//! 32-byte little-endian representation.

/// Successive doublings of a fixed field element (7 raised to the power
/// 7^7, reduced mod p). Entry i + 1 is twice entry i.
pub const DBL_TEST_VECTORS: &[&str] = &[
    "77ac4143833a91e4b3a24fa36f4c28eeec852c081952348280a428e913b53264",
    "ed588386077522c968e9a046dcf49288d433b7062acc2ed1b8cbb3a8d4c27754",
    "d9b1060d10ea4492d276438db54568bda38fcc034cc0236f291aca2756de0135",
    "b2630d1a20d48924a5ed861a6b8bd07a471f9907988047de5234944facbc036a",
    "63c71a3441a813494b7f0f35d372e3a189669005282955895deb8a7505d21960",
    "c58e35688350279297a2206aa34109f00df57e01487a70df725978c1b7fc454c",
    "891d6bd007a14e2430e942d443df548c16125cf9871ca78b9d3553591c529e24",
    "123bd6a00f429d4860d285a887bea9182d24b8f20f394e173b6ba6b238a43c49",
    "2376ac4120843a91c1480d510cd995dd5470cedb179a62fb2d59af3b1ea18b1e",
    "46ec58834008752283911aa218b22bbba9e09cb72f34c5f65bb25e773c42173d",
    "8bd8b1068210ea4407c736442ec099224ee99765579050ba6fe71fc525dd4006",
    "16b1630d0421d4890e8e6d885c8033459cd22fcbae20a174dfce3f8a4bba810c",
    "2c62c71a0842a8131d1cdb10b900678a38a55f965d4142e9be9d7f1497740319",
    "58c48e35108450273a38b6217201ce14714abf2cbb8284d27d3bff282ee90632",
    "b0881d6b2008a14e74706c43e4029c29e2947e59760509a5fb76fe515cd20d64",
    "5f113bd64110429de984da86c5617affbe515ba9e432d816af705f7a65fd2d54",
];

/// Pairs (x, x^-1 mod p).
pub const INV_TEST_VECTORS: &[(&str, &str)] = &[
    (
        "0200000000000000000000000000000000000000000000000000000000000000",
        "01000080ffffff7fff2dff7f01d2dea902ecd00404ec9c19a4bece94a9d3f639",
    ),
    (
        "0300000000000000000000000000000000000000000000000000000000000000",
        "01000000aaaaaaaa543d5455576d7ee258e56b06b03ad1ccdaa81371371a494d",
    ),
    (
        "0100010000000000000000000000000000000000000000000000000000000000",
        "c0a1405e0000ffff410260f4db4cc771dc13bfe44e57b6415f9feb784cab3e49",
    ),
    (
        "77ac4143833a91e4b3a24fa36f4c28eeec852c081952348280a428e913b53264",
        "6ba4aaa4a2a9ee3d221080fad0fb25b97da05ccb8dd3b0f141d15d934468c562",
    ),
];

/// Triples (base, exponent, base^exponent mod p). The exponent is also a
/// 32-byte little-endian integer but is not a field element.
pub const POW_TEST_VECTORS: &[(&str, &str, &str)] = &[
    (
        "0300000000000000000000000000000000000000000000000000000000000000",
        "efbeadde00000000000000000000000000000000000000000000000000000000",
        "4327f4c0b378636e4e28eb3c4d8a1c8d919d8c87c75dd778881599c62500505d",
    ),
    (
        "77ac4143833a91e4b3a24fa36f4c28eeec852c081952348280a428e913b53264",
        "fffffffffefffffffe5bfeff02a4bd5305d8a10908d83933487d9d2953a7ed73",
        "6ba4aaa4a2a9ee3d221080fad0fb25b97da05ccb8dd3b0f141d15d934468c562",
    ),
];
