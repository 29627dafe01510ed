/// Built-in OUI registry excerpt in Wireshark manuf format
/// (prefix, short name, long name, tab separated).
/// Serves as the static lookup tier when no manuf.txt override is installed.
pub const BUILTIN_OUI: &str = "
00:00:5E	Icann	ICANN, IANA Department
00:03:93	Apple	Apple, Inc.
00:17:F2	Apple	Apple, Inc.
F0:18:98	Apple	Apple, Inc.
3C:5A:37	Samsung	Samsung Electronics Co.,Ltd
8C:77:12	Samsung	Samsung Electronics Co.,Ltd
E8:50:8B	Samsung	Samsung Electronics Co.,Ltd
B8:27:EB	RaspberryPi	Raspberry Pi Foundation
DC:A6:32	RaspberryPi	Raspberry Pi Trading Ltd
00:05:69	Vmware	VMware, Inc.
00:0C:29	Vmware	VMware, Inc.
00:50:56	Vmware	VMware, Inc.
08:00:27	PcsCompu	PCS Systemtechnik GmbH
00:15:5D	Microsoft	Microsoft Corporation
00:50:F2	Microsoft	Microsoft Corporation
00:0D:3A	Microsoft	Microsoft Corporation
52:54:00	Qemu	QEMU virtual NIC
00:1C:42	Parallels	Parallels, Inc.
00:16:3E	Xensource	Xensource, Inc.
00:00:0C	Cisco	Cisco Systems, Inc
00:01:42	Cisco	Cisco Systems, Inc
00:1D:7E	Cisco-Linksys	Cisco-Linksys, LLC
00:14:22	Dell	Dell Inc.
00:21:9B	Dell	Dell Inc.
00:02:B3	Intel	Intel Corporation
00:1B:21	Intel	Intel Corporate
08:00:09	HewlettP	Hewlett Packard
00:60:B0	HewlettP	Hewlett Packard
00:1F:29	HewlettP	Hewlett-Packard Company
00:09:5B	Netgear	Netgear Inc.
20:4E:7F	Netgear	Netgear Inc.
14:CC:20	Tp-LinkT	TP-LINK Technologies Co.,Ltd.
50:C7:BF	Tp-LinkT	TP-LINK Technologies Co.,Ltd.
24:A4:3C	Ubiquiti	Ubiquiti Networks Inc.
DC:9F:DB	Ubiquiti	Ubiquiti Networks Inc.
00:80:77	Brother	Brother Industries, Ltd.
00:00:48	SeikoEpson	Seiko Epson Corporation
00:26:73	Ricoh	Ricoh Company, Ltd.
";
