// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

/*!
Permissive parsing of IPv4, IPv6 and MAC address strings.

Besides plain addresses, a string may hold ranges (`1.2.3.4-10`), wildcards
(`1.2.*.4`, `1:2::0__`), inet_aton forms (`0x7f.1`), prefix lengths and masks
(`1.2.0.0/16`, `1.2.3.4/255.255.0.0`), IPv6 zones and single-segment forms.
Every result is an immutable [Address] whose segments each carry a lower and
an upper value.

```
use miniaddr::{parse_ip_address, parse_mac_address};

let a = parse_ip_address("1.2.3.4-10").unwrap();
assert_eq!(a.count(), 7);
assert_eq!(a.to_string(), "1.2.3.4-10");

let m = parse_mac_address("0102.0304.0506").unwrap();
assert_eq!(m.to_string(), "01:02:03:04:05:06");
```
*/

mod addrtools;

pub use addrtools::*;
